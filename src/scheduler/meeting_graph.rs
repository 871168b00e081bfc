/// How often each pair of teams has shared a group. Symmetric, stored as a packed
/// upper triangle indexed by team index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingGraph {
    team_count: usize,
    counts: Vec<u32>,
}

impl MeetingGraph {
    pub fn new(team_count: usize) -> Self {
        let pairs = team_count * team_count.saturating_sub(1) / 2;
        Self {
            team_count,
            counts: vec![0; pairs],
        }
    }

    pub fn team_count(&self) -> usize {
        self.team_count
    }

    fn slot(&self, a: usize, b: usize) -> usize {
        debug_assert!(a != b && a < self.team_count && b < self.team_count);
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        // Rows before `low` hold (n-1) + (n-2) + ... + (n-low) pairs.
        low * (2 * self.team_count - low - 1) / 2 + (high - low - 1)
    }

    pub fn meetings(&self, a: usize, b: usize) -> u32 {
        if a == b {
            return 0;
        }
        self.counts[self.slot(a, b)]
    }

    pub fn record_pair(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let slot = self.slot(a, b);
        self.counts[slot] += 1;
    }

    /// Records every pair within one group.
    pub fn record_group(&mut self, members: &[usize]) {
        for (i, &a) in members.iter().enumerate() {
            for &b in &members[i + 1..] {
                self.record_pair(a, b);
            }
        }
    }

    /// Prior meetings between `candidate` and each of `members`.
    pub fn cost_with(&self, candidate: usize, members: &[usize]) -> u32 {
        members
            .iter()
            .map(|&member| self.meetings(candidate, member))
            .sum()
    }

    /// Meetings beyond the first, summed over all pairs.
    pub fn repeat_meetings(&self) -> u32 {
        self.counts.iter().map(|&c| c.saturating_sub(1)).sum()
    }

    /// Largest number of repeats for any single pair.
    pub fn max_pair_repeats(&self) -> u32 {
        self.counts
            .iter()
            .map(|&c| c.saturating_sub(1))
            .max()
            .unwrap_or(0)
    }

    pub fn distinct_pairs_met(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }
}
