// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coin denominations and change decomposition.

use super::MachineError;

/// A coin accepted by the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coin {
    Five,
    Ten,
    Twenty,
    Fifty,
    Hundred,
}

impl Coin {
    /// All denominations, largest first.
    pub const DESCENDING: [Coin; 5] = [
        Coin::Hundred,
        Coin::Fifty,
        Coin::Twenty,
        Coin::Ten,
        Coin::Five,
    ];

    pub const SMALLEST: Coin = Coin::Five;

    pub const fn value(self) -> u64 {
        match self {
            Coin::Five => 5,
            Coin::Ten => 10,
            Coin::Twenty => 20,
            Coin::Fifty => 50,
            Coin::Hundred => 100,
        }
    }

    pub fn from_value(amount: i64) -> Option<Coin> {
        Coin::DESCENDING
            .into_iter()
            .find(|coin| i64::try_from(coin.value()) == Ok(amount))
    }
}

/// Admission check for a single inserted coin.
pub fn insert_coin(amount: i64) -> Result<Coin, MachineError> {
    Coin::from_value(amount).ok_or_else(|| MachineError::InvalidCoin(amount.to_string()))
}

/// Integer value of a coin amount taken from a JSON body.
///
/// Fractions and integers outside `i64` are never coins.
pub fn coin_amount(amount: &serde_json::Number) -> Result<i64, MachineError> {
    amount
        .as_i64()
        .ok_or_else(|| MachineError::InvalidCoin(amount.to_string()))
}

/// Whether `amount` is a sum of accepted denominations.
pub fn is_representable(amount: u64) -> bool {
    amount % Coin::SMALLEST.value() == 0
}

/// Break `amount` into coins, largest first.
///
/// Greedy selection yields the fewest coins for this denomination set.
/// Fails with `UnrepresentableAmount` if `amount` is off the coin grid.
pub fn decompose(amount: u64) -> Result<Vec<u64>, MachineError> {
    let mut remaining = amount;
    let mut change = Vec::new();

    for coin in Coin::DESCENDING {
        let value = coin.value();
        let count = remaining / value;
        let count_usize =
            usize::try_from(count).map_err(|_| MachineError::UnrepresentableAmount(amount))?;
        change.extend(std::iter::repeat_n(value, count_usize));
        remaining -= count * value;
    }

    if remaining != 0 {
        return Err(MachineError::UnrepresentableAmount(amount));
    }
    Ok(change)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fewest coins for `amount` by exhaustive dynamic programming.
    fn min_coin_count(amount: u64) -> Option<usize> {
        let amount = amount as usize;
        let mut best = vec![None; amount + 1];
        best[0] = Some(0usize);
        for total in 1..=amount {
            for coin in Coin::DESCENDING {
                let value = coin.value() as usize;
                if value <= total {
                    if let Some(prev) = best[total - value] {
                        best[total] = Some(best[total].map_or(prev + 1, |b: usize| b.min(prev + 1)));
                    }
                }
            }
        }
        best[amount]
    }

    #[test]
    fn every_denomination_is_accepted() {
        for value in [5, 10, 20, 50, 100] {
            assert_eq!(insert_coin(value).unwrap().value(), value as u64);
        }
    }

    #[test]
    fn other_amounts_are_rejected() {
        for value in -200..=200i64 {
            if [5, 10, 20, 50, 100].contains(&value) {
                continue;
            }
            assert!(matches!(insert_coin(value), Err(MachineError::InvalidCoin(v)) if v == value.to_string()));
        }
        assert!(matches!(insert_coin(7), Err(MachineError::InvalidCoin(v)) if v == "7"));
        assert!(insert_coin(i64::MAX).is_err());
    }

    #[test]
    fn json_amounts_must_be_integers() {
        let amount = |raw: &str| serde_json::from_str::<serde_json::Number>(raw).unwrap();

        assert_eq!(coin_amount(&amount("50")).unwrap(), 50);
        assert_eq!(coin_amount(&amount("-5")).unwrap(), -5);
        assert!(matches!(
            coin_amount(&amount("5.0")),
            Err(MachineError::InvalidCoin(v)) if v == "5.0"
        ));
        assert!(matches!(
            coin_amount(&amount("99999999999999999999")),
            Err(MachineError::InvalidCoin(_))
        ));
    }

    #[test]
    fn change_examples() {
        assert_eq!(decompose(0).unwrap(), Vec::<u64>::new());
        assert_eq!(decompose(40).unwrap(), vec![20, 20]);
        assert_eq!(decompose(85).unwrap(), vec![50, 20, 10, 5]);
        assert_eq!(decompose(265).unwrap(), vec![100, 100, 50, 10, 5]);
    }

    #[test]
    fn greedy_change_sums_to_amount_with_fewest_coins() {
        for amount in (0..=1000).step_by(5) {
            let change = decompose(amount).unwrap();
            assert_eq!(change.iter().sum::<u64>(), amount);
            assert!(change.windows(2).all(|w| w[0] >= w[1]));
            assert_eq!(Some(change.len()), min_coin_count(amount), "amount {amount}");
        }
    }

    #[test]
    fn amounts_off_the_coin_grid_are_unrepresentable() {
        assert!(matches!(decompose(7), Err(MachineError::UnrepresentableAmount(7))));
        assert!(!is_representable(42));
        assert!(is_representable(45));
    }
}
