//! Gold ledger shared by combat rewards, tower trades, and quiz bonuses.

use quiz_defence_core::Rejection;

/// Non-negative gold balance. Debits either succeed in full or leave the
/// balance untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ledger {
    balance: u32,
}

impl Ledger {
    pub(crate) const fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> u32 {
        self.balance
    }

    /// Credits gold, saturating at `u32::MAX`, and returns the new balance.
    pub(crate) fn credit(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }

    /// Debits gold and returns the new balance.
    pub(crate) fn debit(&mut self, amount: u32) -> Result<u32, Rejection> {
        let Some(remaining) = self.balance.checked_sub(amount) else {
            return Err(Rejection::InsufficientFunds {
                required: amount,
                available: self.balance,
            });
        };

        self.balance = remaining;
        Ok(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_beyond_balance_is_rejected_without_effect() {
        let mut ledger = Ledger::new(20);
        assert_eq!(
            ledger.debit(30),
            Err(Rejection::InsufficientFunds {
                required: 30,
                available: 20
            })
        );
        assert_eq!(ledger.balance(), 20);
    }

    #[test]
    fn exact_debit_empties_ledger() {
        let mut ledger = Ledger::new(30);
        assert_eq!(ledger.debit(30), Ok(0));
        assert_eq!(ledger.balance(), 0);
        assert!(ledger.debit(1).is_err());
    }

    #[test]
    fn credit_saturates() {
        let mut ledger = Ledger::new(u32::MAX - 1);
        assert_eq!(ledger.credit(5), u32::MAX);
    }
}
