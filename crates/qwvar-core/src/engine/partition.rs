/// Deterministic round-robin assignment of grid indices to worker slots.
///
/// Slot `k` of `p` owns exactly the indices `i` with `i % p == k`, so the
/// per-slot sets partition the grid with no overlap and no omission for any
/// pool size. A pool larger than the grid leaves the surplus slots with empty
/// assignments, which every consumer tolerates as a zero-length local sum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPartition {
    assignments: Vec<Vec<usize>>,
}

impl GridPartition {
    pub fn round_robin(num_points: usize, num_slots: usize) -> Self {
        let num_slots = num_slots.max(1);
        let mut assignments = vec![Vec::new(); num_slots];
        for index in 0..num_points {
            assignments[index % num_slots].push(index);
        }
        Self { assignments }
    }

    #[inline]
    pub fn num_slots(&self) -> usize {
        self.assignments.len()
    }

    #[inline]
    pub fn indices(&self, slot: usize) -> &[usize] {
        &self.assignments[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered_indices(partition: &GridPartition) -> Vec<usize> {
        let mut all: Vec<usize> = (0..partition.num_slots())
            .flat_map(|slot| partition.indices(slot).iter().copied())
            .collect();
        all.sort_unstable();
        all
    }

    #[test]
    fn every_index_is_assigned_exactly_once() {
        for &(n, p) in &[(10, 3), (100, 7), (5, 5), (1, 1), (0, 4)] {
            let partition = GridPartition::round_robin(n, p);
            assert_eq!(covered_indices(&partition), (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn slots_own_their_residue_class() {
        let partition = GridPartition::round_robin(10, 3);
        assert_eq!(partition.indices(0), &[0, 3, 6, 9]);
        assert_eq!(partition.indices(1), &[1, 4, 7]);
        assert_eq!(partition.indices(2), &[2, 5, 8]);
    }

    #[test]
    fn more_slots_than_points_leaves_surplus_slots_empty() {
        let partition = GridPartition::round_robin(2, 5);
        assert_eq!(partition.indices(0), &[0]);
        assert_eq!(partition.indices(1), &[1]);
        for slot in 2..5 {
            assert!(partition.indices(slot).is_empty());
        }
        assert_eq!(covered_indices(&partition), vec![0, 1]);
    }

    #[test]
    fn assignment_is_a_pure_function_of_its_inputs() {
        assert_eq!(
            GridPartition::round_robin(37, 4),
            GridPartition::round_robin(37, 4)
        );
    }
}
