use crate::domain::model::{FixedPositions, SUFFIX_LEN};

/// Enumerates `base_prefix + suffix` over every free suffix position.
///
/// Free positions take all digit combinations in ascending lexicographic
/// order of the free-digit tuple; pinned positions always carry their digit.
/// Each call to [`NumberGenerator::iter`] starts from the first candidate.
#[derive(Debug, Clone)]
pub struct NumberGenerator {
    base_prefix: String,
    fixed: FixedPositions,
}

impl NumberGenerator {
    pub fn new(base_prefix: impl Into<String>, fixed: FixedPositions) -> Self {
        Self {
            base_prefix: base_prefix.into(),
            fixed,
        }
    }

    pub fn base_prefix(&self) -> &str {
        &self.base_prefix
    }

    pub fn fixed_positions(&self) -> &FixedPositions {
        &self.fixed
    }

    /// 10^(free positions)
    pub fn candidate_count(&self) -> u64 {
        10u64.pow((SUFFIX_LEN - self.fixed.len()) as u32)
    }

    pub fn iter(&self) -> Candidates<'_> {
        Candidates {
            generator: self,
            free: self.fixed.free_positions(),
            next_index: 0,
            total: self.candidate_count(),
        }
    }

    /// Candidate for the `index`-th free-digit combination.
    fn build(&self, free: &[usize], mut index: u64) -> String {
        let mut suffix = [b'0'; SUFFIX_LEN];
        for position in 0..SUFFIX_LEN {
            if let Some(digit) = self.fixed.get(position) {
                suffix[position] = b'0' + digit;
            }
        }
        // 最後一個自由位數變化最快
        for &position in free.iter().rev() {
            suffix[position] = b'0' + (index % 10) as u8;
            index /= 10;
        }

        let mut number = String::with_capacity(self.base_prefix.len() + SUFFIX_LEN);
        number.push_str(&self.base_prefix);
        number.extend(suffix.iter().map(|&b| b as char));
        number
    }
}

impl<'a> IntoIterator for &'a NumberGenerator {
    type Item = String;
    type IntoIter = Candidates<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Candidates<'a> {
    generator: &'a NumberGenerator,
    free: Vec<usize>,
    next_index: u64,
    total: u64,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.next_index >= self.total {
            return None;
        }
        let number = self.generator.build(&self.free, self.next_index);
        self.next_index += 1;
        Some(number)
    }

    fn nth(&mut self, n: usize) -> Option<String> {
        self.next_index = self.next_index.saturating_add(n as u64).min(self.total);
        self.next()
    }

    fn last(self) -> Option<String> {
        if self.next_index >= self.total {
            return None;
        }
        Some(self.generator.build(&self.free, self.total - 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.total - self.next_index) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Candidates<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::FixedDigit;
    use std::collections::HashSet;

    fn generator(fixed: &[(usize, u8)]) -> NumberGenerator {
        let digits: Vec<FixedDigit> = fixed
            .iter()
            .map(|&(index, digit)| FixedDigit { index, digit })
            .collect();
        NumberGenerator::new("8801886", FixedPositions::new(&digits).unwrap())
    }

    #[test]
    fn test_count_and_shape_with_two_fixed() {
        let generator = generator(&[(4, 0), (5, 0)]);
        let numbers: Vec<String> = generator.iter().collect();

        assert_eq!(generator.candidate_count(), 10_000);
        assert_eq!(numbers.len(), 10_000);

        let unique: HashSet<&String> = numbers.iter().collect();
        assert_eq!(unique.len(), numbers.len());

        for number in &numbers {
            assert_eq!(number.len(), 13);
            assert!(number.starts_with("8801886"));
            assert!(number.ends_with("00"));
            assert!(number.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_ascending_order_of_free_digits() {
        let generator = generator(&[(4, 0), (5, 0)]);
        let numbers: Vec<String> = generator.iter().take(3).collect();
        assert_eq!(
            numbers,
            vec!["8801886000000", "8801886000100", "8801886000200"]
        );
        assert_eq!(generator.iter().last().unwrap(), "8801886999900");
    }

    #[test]
    fn test_pinned_digit_in_the_middle() {
        let generator = generator(&[(0, 8), (2, 3), (3, 0), (4, 1), (5, 9)]);
        let numbers: Vec<String> = generator.iter().collect();
        assert_eq!(numbers.len(), 10);
        assert_eq!(numbers[0], "8801886803019");
        assert_eq!(numbers[9], "8801886893019");
    }

    #[test]
    fn test_all_positions_fixed_yields_one() {
        let generator = generator(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 6)]);
        let numbers: Vec<String> = generator.iter().collect();
        assert_eq!(numbers, vec!["8801886123456"]);
    }

    #[test]
    fn test_iteration_is_restartable_and_deterministic() {
        let generator = generator(&[(3, 5), (4, 0), (5, 0)]);
        let first: Vec<String> = generator.iter().collect();
        let second: Vec<String> = (&generator).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1000);
        assert!(first.iter().all(|n| &n[10..] == "500"));
    }

    #[test]
    fn test_size_hint_tracks_progress() {
        let generator = generator(&[(1, 0), (2, 0), (3, 0), (4, 0), (5, 0)]);
        let mut iter = generator.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        iter.next();
        assert_eq!(iter.len(), 8);
        assert_eq!(iter.nth(3).unwrap(), "8801886500000");
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.nth(10), None);
    }

    #[test]
    fn test_unconstrained_count() {
        let generator = generator(&[]);
        assert_eq!(generator.candidate_count(), 1_000_000);
        assert_eq!(generator.iter().next().unwrap(), "8801886000000");
    }
}
