use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anchor_lang::prelude::Pubkey;
use raffle::state::{RaffleAccount, RaffleTerms};
use raffle_keeper::{
    CommitReceipt, KeeperConfig, KeeperError, OracleError, RaffleChain, RaffleEntry,
    RandomnessOracle, RetryPolicy,
};

pub const START: i64 = 1_700_000_000;
pub const TICKET_PRICE: u64 = 100_000;
pub const STARTING_BALANCE: u64 = 10_000_000;

/// Slots a committed request stays revealable.
const MAX_REVEAL_AGE: u64 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Raffles,
    Raffle,
    Clock,
    Slot,
    CreateRequest,
    Commit,
    RevealDraw,
    Refund,
}

struct Request {
    seed_slot: Option<u64>,
    value: [u8; 32],
}

#[derive(Default)]
struct Ledger {
    now: i64,
    slot: u64,
    next_id: u64,
    signatures: u64,
    raffles: BTreeMap<Pubkey, RaffleAccount>,
    requests: HashMap<Pubkey, Request>,
    balances: HashMap<Pubkey, u64>,
    escrow: HashMap<Pubkey, u64>,
    failures: HashMap<Op, VecDeque<KeeperError>>,
    calls: Vec<Op>,
}

impl Ledger {
    fn enter(&mut self, op: Op) -> Result<(), KeeperError> {
        self.calls.push(op);
        match self.failures.get_mut(&op).and_then(VecDeque::pop_front) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn land(&mut self) -> String {
        self.slot += 1;
        self.signatures += 1;
        format!("sig-{}", self.signatures)
    }

    fn raffle(&self, address: &Pubkey) -> Result<RaffleAccount, KeeperError> {
        self.raffles
            .get(address)
            .cloned()
            .ok_or(KeeperError::AccountNotFound(*address))
    }

    fn escrow_balance(&self, raffle: &Pubkey) -> u64 {
        self.escrow.get(raffle).copied().unwrap_or(0)
    }

    fn pay(&mut self, raffle: &Pubkey, to: &Pubkey, amount: u64) {
        *self.escrow.entry(*raffle).or_default() -= amount;
        *self.balances.entry(*to).or_default() += amount;
    }
}

/// In-memory ledger and oracle driven by the program's own state transitions.
/// Each submitted transaction applies completely or not at all.
pub struct SimulatedChain {
    ledger: Mutex<Ledger>,
}

impl SimulatedChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            ledger: Mutex::new(Ledger {
                now: START,
                slot: 1_000,
                ..Ledger::default()
            }),
        })
    }

    pub fn create_raffle(&self, min_tickets: u32, max_tickets: u32, deadline: i64) -> Pubkey {
        let mut ledger = self.ledger.lock().unwrap();
        let seller = Pubkey::new_unique();
        let terms = RaffleTerms {
            item_name: "Espresso machine".to_string(),
            item_description: "Dual boiler, lightly used".to_string(),
            item_image_uri: "ipfs://espresso".to_string(),
            selling_price: 1_000_000,
            ticket_price: TICKET_PRICE,
            min_tickets,
            max_tickets,
            deadline,
        };
        terms.validate(ledger.now).unwrap();
        let id = ledger.next_id;
        ledger.next_id += 1;
        let (address, bump) = RaffleAccount::address(&seller, id);
        let (_, escrow_bump) = RaffleAccount::escrow_address(&seller, id);
        let account = RaffleAccount::open(id, seller, Pubkey::new_unique(), terms, bump, escrow_bump);
        ledger.raffles.insert(address, account);
        ledger.escrow.insert(address, 0);
        address
    }

    pub fn buy(&self, raffle: &Pubkey, buyer: &Pubkey, num_tickets: u32) {
        let mut ledger = self.ledger.lock().unwrap();
        let now = ledger.now;
        let account = ledger.raffles.get_mut(raffle).unwrap();
        let cost = account.record_purchase(*buyer, num_tickets, now).unwrap();
        *ledger.balances.entry(*buyer).or_insert(STARTING_BALANCE) -= cost;
        *ledger.escrow.get_mut(raffle).unwrap() += cost;
    }

    pub fn advance(&self, seconds: i64) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.now += seconds;
        ledger.slot += (seconds as u64) * 2;
    }

    pub fn fail_next(&self, op: Op, error: KeeperError) {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.failures.entry(op).or_default().push_back(error);
    }

    pub fn state(&self, raffle: &Pubkey) -> RaffleAccount {
        self.ledger.lock().unwrap().raffle(raffle).unwrap()
    }

    pub fn balance(&self, owner: &Pubkey) -> u64 {
        let ledger = self.ledger.lock().unwrap();
        ledger.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn escrow(&self, raffle: &Pubkey) -> u64 {
        self.ledger.lock().unwrap().escrow_balance(raffle)
    }

    pub fn count(&self, op: Op) -> usize {
        let ledger = self.ledger.lock().unwrap();
        ledger.calls.iter().filter(|call| **call == op).count()
    }
}

impl RaffleChain for SimulatedChain {
    async fn raffles(&self) -> Result<Vec<RaffleEntry>, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Raffles)?;
        Ok(ledger
            .raffles
            .iter()
            .map(|(address, account)| RaffleEntry {
                address: *address,
                account: account.clone(),
            })
            .collect())
    }

    async fn raffle(&self, address: &Pubkey) -> Result<RaffleAccount, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Raffle)?;
        ledger.raffle(address)
    }

    async fn unix_timestamp(&self) -> Result<i64, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Clock)?;
        Ok(ledger.now)
    }

    async fn slot(&self) -> Result<u64, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Slot)?;
        ledger.slot += 1;
        Ok(ledger.slot)
    }

    async fn commit_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<CommitReceipt, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Commit)?;
        let mut account = ledger.raffle(&raffle.address)?;
        let slot = ledger.slot + 1;
        let seed_slot = slot - 1;
        if !ledger.requests.contains_key(randomness) {
            return Err(KeeperError::AccountNotFound(*randomness));
        }
        account.commit_randomness(*randomness, seed_slot, slot, ledger.now)?;

        if let Some(request) = ledger.requests.get_mut(randomness) {
            request.seed_slot = Some(seed_slot);
        }
        ledger.raffles.insert(raffle.address, account);
        let signature = ledger.land();
        Ok(CommitReceipt { signature, slot })
    }

    async fn reveal_and_draw(
        &self,
        raffle: &RaffleEntry,
        randomness: &Pubkey,
    ) -> Result<String, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::RevealDraw)?;
        let mut account = ledger.raffle(&raffle.address)?;
        account.check_reveal(*randomness, ledger.now)?;
        let slot = ledger.slot + 1;
        let (seed_slot, value) = match ledger.requests.get(randomness) {
            Some(Request {
                seed_slot: Some(seed_slot),
                value,
            }) => (*seed_slot, *value),
            Some(_) => return Err(OracleError::Request("request not committed".into()).into()),
            None => return Err(KeeperError::AccountNotFound(*randomness)),
        };
        if slot <= seed_slot + 1 {
            return Err(OracleError::NotYetSettled.into());
        }
        if slot - seed_slot > MAX_REVEAL_AGE {
            return Err(OracleError::TooOld.into());
        }

        account.settle_draw(*randomness, &value, ledger.now)?;
        let payout = ledger.escrow_balance(&raffle.address);
        let seller = account.seller;
        ledger.raffles.insert(raffle.address, account);
        ledger.pay(&raffle.address, &seller, payout);
        Ok(ledger.land())
    }

    async fn refund_tickets(
        &self,
        raffle: &RaffleEntry,
        buyers: &[Pubkey],
    ) -> Result<String, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::Refund)?;
        let mut account = ledger.raffle(&raffle.address)?;
        account.begin_refund(ledger.now)?;

        let mut payments = Vec::new();
        for buyer in buyers {
            let (run, amount) = account
                .next_refund()?
                .ok_or_else(|| KeeperError::Program("RefundAccountMismatch".into()))?;
            if run.buyer != *buyer {
                return Err(KeeperError::Program("RefundAccountMismatch".into()));
            }
            payments.push((run.buyer, amount));
        }

        ledger.raffles.insert(raffle.address, account);
        for (buyer, amount) in payments {
            ledger.pay(&raffle.address, &buyer, amount);
        }
        Ok(ledger.land())
    }
}

impl RandomnessOracle for SimulatedChain {
    async fn create_request(&self) -> Result<Pubkey, KeeperError> {
        let mut ledger = self.ledger.lock().unwrap();
        ledger.enter(Op::CreateRequest)?;
        let request = Pubkey::new_unique();
        let mut value = [0u8; 32];
        value.copy_from_slice(&request.to_bytes());
        ledger.requests.insert(
            request,
            Request {
                seed_slot: None,
                value,
            },
        );
        ledger.land();
        Ok(request)
    }
}

pub fn config() -> KeeperConfig {
    KeeperConfig {
        retry: RetryPolicy {
            jitter: 0.0,
            ..RetryPolicy::default()
        },
        inter_raffle_delay: Duration::from_millis(100),
        reveal_delay: Duration::from_millis(500),
        ..KeeperConfig::default()
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
