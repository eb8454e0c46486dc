//! Input arrays handed to the sorting service.

use anyhow::{bail, Context, Result};
use rand::Rng;

pub const DEFAULT_SIZE: usize = 50;
pub const DEFAULT_MAX_VALUE: i64 = 100;

/// `size` values drawn uniformly from `1..=max_value`.
pub fn random_input(size: usize, max_value: i64) -> Vec<i64> {
    let max_value = max_value.max(1);
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen_range(1..=max_value)).collect()
}

/// Parse a comma-separated list such as `"5, 3,4,1"`.
pub fn parse_numbers(raw: &str) -> Result<Vec<i64>> {
    let numbers = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .with_context(|| format!("invalid number '{s}'"))
        })
        .collect::<Result<Vec<_>>>()?;
    if numbers.is_empty() {
        bail!("no numbers given");
    }
    Ok(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_input_respects_size_and_range() {
        let v = random_input(DEFAULT_SIZE, DEFAULT_MAX_VALUE);
        assert_eq!(v.len(), DEFAULT_SIZE);
        assert!(v.iter().all(|n| (1..=DEFAULT_MAX_VALUE).contains(n)));

        assert!(random_input(0, 10).is_empty());
        assert!(random_input(5, 0).iter().all(|n| *n == 1));
    }

    #[test]
    fn parse_numbers_tolerates_whitespace() {
        assert_eq!(parse_numbers("5, 3,4 ,1").unwrap(), vec![5, 3, 4, 1]);
        assert_eq!(parse_numbers("-2,7,").unwrap(), vec![-2, 7]);
    }

    #[test]
    fn parse_numbers_rejects_bad_input() {
        assert!(parse_numbers("").is_err());
        assert!(parse_numbers(" , ").is_err());
        let err = parse_numbers("1,two,3").unwrap_err();
        assert!(format!("{err:#}").contains("two"));
    }
}
