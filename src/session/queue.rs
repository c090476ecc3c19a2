use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::pattern::Pattern;

/// Working queue for one session. Failed patterns go back to the tail.
#[derive(Clone, Debug, Default)]
pub struct PatternQueue {
    pending: VecDeque<Pattern>,
}

impl PatternQueue {
    /// Uniformly random permutation of `patterns`.
    pub fn shuffled<R: Rng + ?Sized>(patterns: &[Pattern], rng: &mut R) -> Self {
        let mut order = patterns.to_vec();
        order.shuffle(rng);
        Self {
            pending: order.into(),
        }
    }

    pub fn dequeue_next(&mut self) -> Option<Pattern> {
        self.pending.pop_front()
    }

    pub fn requeue(&mut self, pattern: Pattern) {
        self.pending.push_back(pattern);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn patterns(texts: &[&str]) -> Vec<Pattern> {
        texts.iter().map(|t| Pattern::new(t, t)).collect()
    }

    fn drain(queue: &mut PatternQueue) -> Vec<String> {
        std::iter::from_fn(|| queue.dequeue_next()).map(|p| p.text).collect()
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let all = patterns(&["a", "b", "c", "d", "e"]);
        let mut rng = SmallRng::seed_from_u64(7);
        let mut queue = PatternQueue::shuffled(&all, &mut rng);
        assert_eq!(queue.len(), 5);
        let mut drained = drain(&mut queue);
        drained.sort();
        assert_eq!(drained, vec!["a", "b", "c", "d", "e"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_shuffle_covers_all_orders_evenly() {
        let all = patterns(&["a", "b", "c"]);
        let mut rng = SmallRng::seed_from_u64(42);
        let mut counts: HashMap<Vec<String>, usize> = HashMap::new();
        for _ in 0..6000 {
            let mut queue = PatternQueue::shuffled(&all, &mut rng);
            *counts.entry(drain(&mut queue)).or_default() += 1;
        }
        assert_eq!(counts.len(), 6);
        for (order, count) in &counts {
            assert!(
                (850..=1150).contains(count),
                "order {order:?} seen {count} times"
            );
        }
    }

    #[test]
    fn test_empty_queue_signals_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut queue = PatternQueue::shuffled(&[], &mut rng);
        assert!(queue.dequeue_next().is_none());
    }

    #[test]
    fn test_requeue_goes_after_pending() {
        let all = patterns(&["only"]);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut queue = PatternQueue::shuffled(&all, &mut rng);
        let first = queue.dequeue_next().unwrap();
        queue.requeue(Pattern::new("x", "x"));
        queue.requeue(first);
        assert_eq!(drain(&mut queue), vec!["x", "only"]);
    }
}
