//! In-memory fakes for the protocol client and remote services
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use squabble_bot::application::errors::{BotError, GatewayError, Service};
use squabble_bot::application::messaging::{CommandParser, CommandRouter, DispatchStats, StreamDispatcher};
use squabble_bot::application::services::IdentityResolver;
use squabble_bot::domain::entities::{
    CreateGameRequest, GameSession, InboundMessage, LeaderboardSnapshot, MemberIdentity, PlayerStanding,
    SocialProfile,
};
use squabble_bot::domain::traits::{
    Conversation, GameService, IdentityDirectory, MessagingClient, TextGenerator,
};

pub const BOT: &str = "bot-inbox";
pub const GROUP: &str = "group-1";
pub const ALICE: &str = "alice-inbox";
pub const BOB: &str = "bob-inbox";
pub const GAME_URL: &str = "https://squabble.test";
pub const RULES: &str = "Capture the most territory!";

pub struct FakeConversation {
    pub id: String,
    pub members: Vec<MemberIdentity>,
    pub sent: Mutex<Vec<String>>,
    pub fail_send: AtomicBool,
}

impl FakeConversation {
    pub fn new(id: &str, members: Vec<MemberIdentity>) -> Self {
        Self {
            id: id.to_string(),
            members,
            sent: Mutex::new(Vec::new()),
            fail_send: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Conversation for FakeConversation {
    fn id(&self) -> &str {
        &self.id
    }

    async fn members(&self) -> Result<Vec<MemberIdentity>, BotError> {
        Ok(self.members.clone())
    }

    async fn send(&self, text: &str) -> Result<(), BotError> {
        if self.fail_send.swap(false, Ordering::SeqCst) {
            return Err(BotError::Network("send failed".to_string()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct FakeClient {
    pub inbox_id: String,
    pub conversations: HashMap<String, Arc<FakeConversation>>,
    pub addresses: HashMap<String, String>,
    pub inbox_state_calls: AtomicUsize,
    pub fail_inbox_states: AtomicBool,
    pub panic_inbox_states: AtomicBool,
}

impl FakeClient {
    pub fn new(conversations: Vec<Arc<FakeConversation>>) -> Self {
        let addresses = conversations
            .iter()
            .flat_map(|c| c.members.iter())
            .filter_map(|m| m.external_address.clone().map(|a| (m.inbox_id.clone(), a)))
            .collect();
        Self {
            inbox_id: BOT.to_string(),
            conversations: conversations.into_iter().map(|c| (c.id.clone(), c)).collect(),
            addresses,
            inbox_state_calls: AtomicUsize::new(0),
            fail_inbox_states: AtomicBool::new(false),
            panic_inbox_states: AtomicBool::new(false),
        }
    }

    pub fn inbox_state_calls(&self) -> usize {
        self.inbox_state_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagingClient for FakeClient {
    fn inbox_id(&self) -> &str {
        &self.inbox_id
    }

    async fn stream_all_messages(&self) -> Result<mpsc::Receiver<InboundMessage>, BotError> {
        let (_tx, rx) = mpsc::channel(1);
        Ok(rx)
    }

    async fn conversation(&self, id: &str) -> Result<Option<Arc<dyn Conversation>>, BotError> {
        Ok(self
            .conversations
            .get(id)
            .map(|c| c.clone() as Arc<dyn Conversation>))
    }

    async fn inbox_states(&self, inbox_ids: &[String]) -> Result<Vec<MemberIdentity>, BotError> {
        self.inbox_state_calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_inbox_states.load(Ordering::SeqCst) {
            panic!("inbox state backend crashed");
        }
        if self.fail_inbox_states.load(Ordering::SeqCst) {
            return Err(BotError::Network("inbox state unavailable".to_string()));
        }
        Ok(inbox_ids
            .iter()
            .map(|id| MemberIdentity {
                inbox_id: id.clone(),
                external_address: self.addresses.get(id).cloned(),
                installation_ids: vec![format!("{}-device", id)],
            })
            .collect())
    }
}

pub struct FakeGames {
    pub created: Mutex<Vec<CreateGameRequest>>,
    pub leaderboard: Mutex<Option<LeaderboardSnapshot>>,
    pub leaderboard_queries: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    /// Number of upcoming calls that fail with a 500
    pub fail_next: AtomicUsize,
}

impl FakeGames {
    pub fn new() -> Self {
        Self {
            created: Mutex::new(Vec::new()),
            leaderboard: Mutex::new(None),
            leaderboard_queries: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            fail_next: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn begin(&self) -> Result<usize, GatewayError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let failing = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |f| f.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::Remote { service: Service::GameService, status: 500 });
        }
        Ok(n)
    }
}

#[async_trait]
impl GameService for FakeGames {
    fn base_url(&self) -> &str {
        GAME_URL
    }

    async fn create_game(&self, request: &CreateGameRequest) -> Result<GameSession, GatewayError> {
        let n = self.begin()?;
        self.created.lock().unwrap().push(request.clone());
        Ok(GameSession { id: format!("game-{}", n) })
    }

    async fn latest_game(&self) -> Result<GameSession, GatewayError> {
        self.begin()?;
        Ok(GameSession { id: "latest".to_string() })
    }

    async fn leaderboard(&self, conversation_id: &str) -> Result<LeaderboardSnapshot, GatewayError> {
        self.begin()?;
        self.leaderboard_queries.lock().unwrap().push(conversation_id.to_string());
        self.leaderboard.lock().unwrap().clone().ok_or(GatewayError::Malformed {
            service: Service::GameService,
            reason: "missing field `leaderboard`".to_string(),
        })
    }
}

pub struct FakeDirectory {
    /// lowercase address -> username
    pub usernames: HashMap<String, String>,
    pub calls: AtomicUsize,
    pub requested: Mutex<Vec<Vec<String>>>,
    pub fail: AtomicBool,
}

impl FakeDirectory {
    pub fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            usernames: entries
                .iter()
                .map(|(a, u)| (a.to_lowercase(), u.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
            requested: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityDirectory for FakeDirectory {
    fn max_batch(&self) -> usize {
        350
    }

    async fn users_by_addresses(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, Vec<SocialProfile>>, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(addresses.to_vec());
        if self.fail.load(Ordering::SeqCst) {
            return Err(GatewayError::Remote { service: Service::IdentityDirectory, status: 502 });
        }
        Ok(addresses
            .iter()
            .filter_map(|address| {
                let username = self.usernames.get(&address.to_lowercase())?;
                Some((
                    address.to_lowercase(),
                    vec![SocialProfile {
                        fid: 1,
                        username: username.clone(),
                        display_name: None,
                        pfp_url: None,
                        custody_address: Some(address.clone()),
                        verifications: Vec::new(),
                    }],
                ))
            })
            .collect())
    }
}

pub struct FakeText;

#[async_trait]
impl TextGenerator for FakeText {
    async fn generate(&self, _prompt: &str) -> String {
        RULES.to_string()
    }
}

pub fn standing(id: &str, points: i64, wins: u32, total_games: u32) -> PlayerStanding {
    PlayerStanding {
        external_id: id.to_string(),
        display_name: id.to_uppercase(),
        handle: id.to_string(),
        points,
        wins,
        total_games,
    }
}

/// Bot, alice and bob in one group; alice and bob have directory handles
pub struct Harness {
    pub client: Arc<FakeClient>,
    pub games: Arc<FakeGames>,
    pub directory: Arc<FakeDirectory>,
    pub group: Arc<FakeConversation>,
}

impl Harness {
    pub fn new() -> Self {
        let group = Arc::new(FakeConversation::new(
            GROUP,
            vec![
                MemberIdentity::new(BOT).with_address("0xB07"),
                MemberIdentity::new(ALICE).with_address("0xA11CE"),
                MemberIdentity::new(BOB).with_address("0xB0B"),
            ],
        ));
        Self::with_group(group, &[("0xa11ce", "alice"), ("0xb0b", "bob"), ("0xb07", "squabblebot")])
    }

    pub fn with_group(group: Arc<FakeConversation>, handles: &[(&str, &str)]) -> Self {
        Self {
            client: Arc::new(FakeClient::new(vec![group.clone()])),
            games: Arc::new(FakeGames::new()),
            directory: Arc::new(FakeDirectory::new(handles)),
            group,
        }
    }

    pub fn resolver(&self) -> Arc<IdentityResolver> {
        Arc::new(IdentityResolver::new(self.client.clone(), self.directory.clone()))
    }

    pub fn dispatcher(&self) -> StreamDispatcher {
        let resolver = self.resolver();
        let router = CommandRouter::new(self.games.clone(), resolver.clone(), BOT)
            .with_text_generator(Arc::new(FakeText));
        StreamDispatcher::new(
            self.client.clone(),
            CommandParser::new("/", "squabble"),
            router,
            resolver,
        )
    }

    /// Feed a finite stream and wait for the dispatcher to drain it
    pub async fn run(&self, messages: Vec<InboundMessage>) -> DispatchStats {
        let (tx, rx) = mpsc::channel(messages.len().max(1));
        for message in messages {
            tx.send(message).await.unwrap();
        }
        drop(tx);
        self.dispatcher().run(rx).await
    }

    /// Side effects on the outside world, in one number
    pub fn remote_calls(&self) -> usize {
        self.games.calls() + self.directory.calls() + self.client.inbox_state_calls()
    }
}

pub fn text_from(sender: &str, text: &str) -> InboundMessage {
    InboundMessage::text(GROUP, sender, text)
}
