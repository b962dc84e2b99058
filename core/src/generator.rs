//! Synthetic transaction stream.
//!
//! Produces a timestamp-ordered, seed-reproducible sequence over a fixed
//! user population. Mostly Pareto-distributed small spend, with:
//!   - occasional high-value spikes (above the default CTR-style threshold)
//!   - bursts of rapid transactions from one user
//!   - closed counterparty rings (u0 → u1 → … → u0)

use crate::{
    rng::StreamRng,
    types::{Timestamp, Transaction},
};
use chrono::{DateTime, Duration};
use std::collections::VecDeque;

const LOCATIONS: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Miami",
    "Seattle", "Denver", "Boston", "Atlanta", "Phoenix",
];

const STREAM_AMOUNTS: u64 = 1;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub users:             usize,
    pub start:             Timestamp,
    pub mean_gap_secs:     i64,
    pub spike_probability: f64,
    pub burst_probability: f64,
    pub burst_len:         usize,
    /// Emit a ring after every `ring_every` regular transactions. 0 disables.
    pub ring_every:        usize,
    pub ring_size:         usize,
    pub amount_xmin:       f64,
    pub amount_alpha:      f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            users:             50,
            // 2024-01-01T00:00:00Z
            start:             DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default(),
            mean_gap_secs:     600,
            spike_probability: 0.02,
            burst_probability: 0.01,
            burst_len:         7,
            ring_every:        250,
            ring_size:         4,
            amount_xmin:       20.0,
            amount_alpha:      1.6,
        }
    }
}

pub struct TransactionGenerator {
    config:  GeneratorConfig,
    rng:     StreamRng,
    cursor:  Timestamp,
    emitted: usize,
    pending: VecDeque<Transaction>,
}

impl TransactionGenerator {
    pub fn new(seed: u64, config: GeneratorConfig) -> Self {
        assert!(config.users >= 2, "generator needs at least two users");
        Self {
            rng:     StreamRng::new(seed, STREAM_AMOUNTS),
            cursor:  config.start,
            emitted: 0,
            pending: VecDeque::new(),
            config,
        }
    }

    fn user(i: usize) -> String {
        format!("user_{i:04}")
    }

    fn step(&mut self, max_secs: i64) -> Timestamp {
        let gap = 1 + self.rng.below(max_secs.max(1) as usize) as i64;
        self.cursor += Duration::seconds(gap);
        self.cursor
    }

    fn amount(&mut self) -> f64 {
        let raw = if self.rng.chance(self.config.spike_probability) {
            self.rng.uniform(10_001.0, 50_000.0)
        } else {
            self.rng
                .pareto(self.config.amount_xmin, self.config.amount_alpha)
                .min(9_000.0)
        };
        (raw * 100.0).round() / 100.0
    }

    fn location(&mut self) -> String {
        self.rng.pick(LOCATIONS).to_string()
    }

    fn other_user(&mut self, user: usize) -> usize {
        let n = self.config.users;
        (user + 1 + self.rng.below(n - 1)) % n
    }

    fn regular(&mut self, user: usize, max_gap: i64) -> Transaction {
        let counterparty = self.other_user(user);
        let timestamp = self.step(max_gap);
        Transaction::new(
            Self::user(user),
            self.amount(),
            self.location(),
            Some(Self::user(counterparty)),
            timestamp,
        )
    }

    fn queue_burst(&mut self) {
        let user = self.rng.below(self.config.users);
        for _ in 0..self.config.burst_len {
            let txn = self.regular(user, 60);
            self.pending.push_back(txn);
        }
    }

    fn queue_ring(&mut self) {
        let n = self.config.users;
        let size = self.config.ring_size;
        if size < 3 || size > n {
            return;
        }
        let start = self.rng.below(n);
        let stride = 1 + self.rng.below(n / size);
        let members: Vec<usize> = (0..size).map(|j| (start + j * stride) % n).collect();
        let amount = self.rng.uniform(2_000.0, 9_000.0).round();

        for (j, &from) in members.iter().enumerate() {
            let to = members[(j + 1) % size];
            let timestamp = self.step(300);
            let location = self.location();
            self.pending.push_back(Transaction::new(
                Self::user(from),
                amount,
                location,
                Some(Self::user(to)),
                timestamp,
            ));
        }
    }
}

impl Iterator for TransactionGenerator {
    type Item = Transaction;

    fn next(&mut self) -> Option<Transaction> {
        if let Some(txn) = self.pending.pop_front() {
            return Some(txn);
        }
        self.emitted += 1;

        if self.config.ring_every > 0 && self.emitted % self.config.ring_every == 0 {
            self.queue_ring();
        } else if self.rng.chance(self.config.burst_probability) {
            self.queue_burst();
        }
        if let Some(txn) = self.pending.pop_front() {
            return Some(txn);
        }

        let user = self.rng.below(self.config.users);
        let max_gap = self.config.mean_gap_secs * 2;
        Some(self.regular(user, max_gap))
    }
}
