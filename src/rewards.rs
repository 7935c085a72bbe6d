//! $HYPE rewards: balance, x402 micropayment tips, redemption and tiers.

use thiserror::Error;

/// Balance a fresh session starts with
pub const STARTING_BALANCE: u64 = 1247;
/// Balance needed for the Gold tier
pub const GOLD_TIER_TARGET: u64 = 2000;
/// Cost of one fee rebate
pub const REDEEM_COST: u64 = 500;
/// $HYPE earned per USD tipped
pub const HYPE_PER_USD: f64 = 10.0;
/// Tip sizes offered in the widget, in USD
pub const TIP_AMOUNTS: [f64; 4] = [0.01, 0.10, 0.50, 1.00];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardsError {
    #[error("need {needed} more $HYPE to redeem")]
    InsufficientBalance { needed: u64 },
}

/// $HYPE earned for a tip of `amount_usd`, rounded down
pub fn hype_for_tip(amount_usd: f64) -> u64 {
    if !amount_usd.is_finite() || amount_usd <= 0.0 {
        return 0;
    }
    (amount_usd * HYPE_PER_USD).floor() as u64
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewards {
    balance: u64,
}

impl Rewards {
    pub fn new(balance: u64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    /// Send a tip and credit the earned $HYPE; returns the amount earned
    pub fn tip(&mut self, amount_usd: f64) -> u64 {
        let earned = hype_for_tip(amount_usd);
        self.balance += earned;
        tracing::info!(amount_usd, earned, balance = self.balance, "x402 tip sent");
        earned
    }

    pub fn can_redeem(&self) -> bool {
        self.balance >= REDEEM_COST
    }

    /// $HYPE still missing before a redeem is allowed
    pub fn redeem_shortfall(&self) -> Option<u64> {
        (!self.can_redeem()).then(|| REDEEM_COST - self.balance)
    }

    /// Spend [`REDEEM_COST`] on a fee rebate; returns the new balance
    pub fn redeem(&mut self) -> Result<u64, RewardsError> {
        if let Some(needed) = self.redeem_shortfall() {
            return Err(RewardsError::InsufficientBalance { needed });
        }
        self.balance -= REDEEM_COST;
        tracing::info!(balance = self.balance, "Redeemed $HYPE for fee rebate");
        Ok(self.balance)
    }

    /// Progress toward Gold, 0.0 to 1.0
    pub fn progress(&self) -> f64 {
        (self.balance as f64 / GOLD_TIER_TARGET as f64).min(1.0)
    }

    pub fn remaining_to_gold(&self) -> u64 {
        GOLD_TIER_TARGET.saturating_sub(self.balance)
    }
}

impl Default for Rewards {
    fn default() -> Self {
        Self::new(STARTING_BALANCE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Gold => "Gold",
            Tier::Silver => "Silver",
            Tier::Bronze => "Bronze",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: &'static str,
    pub txns: u32,
    pub rewards: u64,
    pub tier: Tier,
    pub is_current_user: bool,
}

/// Top users this month; the current user's row tracks `balance`
pub fn leaderboard(balance: u64) -> Vec<LeaderboardEntry> {
    let entry = |name, txns, rewards, tier| LeaderboardEntry {
        name,
        txns,
        rewards,
        tier,
        is_current_user: false,
    };

    vec![
        entry("Carlos M.", 1834, 2456, Tier::Gold),
        entry("Chinedu A.", 1621, 2180, Tier::Gold),
        entry("Maria S.", 1455, 1967, Tier::Silver),
        LeaderboardEntry {
            name: "You",
            txns: 892,
            rewards: balance,
            tier: Tier::Silver,
            is_current_user: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hype_for_tip_rounds_down() {
        assert_eq!(hype_for_tip(0.01), 0);
        assert_eq!(hype_for_tip(0.10), 1);
        assert_eq!(hype_for_tip(0.50), 5);
        assert_eq!(hype_for_tip(1.00), 10);
        assert_eq!(hype_for_tip(-1.0), 0);
        assert_eq!(hype_for_tip(f64::NAN), 0);
    }

    #[test]
    fn test_tip_credits_balance() {
        let mut rewards = Rewards::default();
        assert_eq!(rewards.balance(), 1247);

        let earned: u64 = TIP_AMOUNTS.iter().map(|a| rewards.tip(*a)).sum();
        assert_eq!(earned, 16);
        assert_eq!(rewards.balance(), 1263);
    }

    #[test]
    fn test_redeem_deducts_cost() {
        let mut rewards = Rewards::default();
        assert_eq!(rewards.redeem(), Ok(747));
        assert_eq!(rewards.redeem(), Ok(247));
        assert_eq!(rewards.balance(), 247);
    }

    #[test]
    fn test_redeem_refused_below_cost() {
        let mut rewards = Rewards::new(499);
        assert!(!rewards.can_redeem());
        assert_eq!(rewards.redeem_shortfall(), Some(1));
        assert_eq!(
            rewards.redeem(),
            Err(RewardsError::InsufficientBalance { needed: 1 })
        );
        assert_eq!(rewards.balance(), 499);

        let mut exact = Rewards::new(500);
        assert_eq!(exact.redeem_shortfall(), None);
        assert_eq!(exact.redeem(), Ok(0));
    }

    #[test]
    fn test_progress_toward_gold() {
        let rewards = Rewards::default();
        assert!((rewards.progress() - 0.6235).abs() < 1e-9);
        assert_eq!(rewards.remaining_to_gold(), 753);

        let past = Rewards::new(2500);
        assert_eq!(past.progress(), 1.0);
        assert_eq!(past.remaining_to_gold(), 0);
    }

    #[test]
    fn test_leaderboard_tracks_current_user() {
        let board = leaderboard(1300);
        assert_eq!(board.len(), 4);
        assert_eq!(board[0].tier, Tier::Gold);
        let you: Vec<_> = board.iter().filter(|e| e.is_current_user).collect();
        assert_eq!(you.len(), 1);
        assert_eq!(you[0].rewards, 1300);
    }
}
