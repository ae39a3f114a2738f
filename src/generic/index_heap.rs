/*!
A max-heap on variable indices, ordered by a score kept for every index.

The scores are kept for every index, whether or not the index is on the heap, and so the heap acts as a store of scores from which indices may be moved onto (and off of) the heap.
A companion vector tracks the position of each index on the heap, and so [bump](IndexHeap::bump) may restore the heap property after a score increases without a search.

The heap is used to choose decisions in *stable* mode, where scores follow the *exponential* VSIDS scheme:
- Each conflict grows the [increment](IndexHeap::decay) by `1 / decay`, rather than decaying every score.
- A score exceeding the maximum triggers a [rescale](IndexHeap::rescale) of every score, and of the increment.

```rust
# use ring_sat::generic::index_heap::IndexHeap;
let mut heap = IndexHeap::new(4);
for index in 0..4 {
    heap.push(index);
}
heap.bump(2, 1e150);
heap.bump(2, 1e150);
heap.bump(1, 1e150);

assert_eq!(heap.pop_max(), Some(2));
assert_eq!(heap.pop_max(), Some(1));
assert!(!heap.contains(2));
```
*/

/// The index heap struct.
#[derive(Clone, Debug)]
pub struct IndexHeap {
    scores: Vec<f64>,
    position_in_heap: Vec<Option<usize>>,
    heap: Vec<usize>,
    increment: f64,
}

impl IndexHeap {
    /// A heap over `size` indices, each with score zero, and none of which are on the heap.
    pub fn new(size: usize) -> Self {
        IndexHeap {
            scores: vec![0.0; size],
            position_in_heap: vec![None; size],
            heap: Vec::with_capacity(size),
            increment: 1.0,
        }
    }

    /// A count of indices with scores.
    pub fn size(&self) -> usize {
        self.scores.len()
    }

    /// A count of indices on the heap.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.position_in_heap[index].is_some()
    }

    pub fn score(&self, index: usize) -> f64 {
        self.scores[index]
    }

    /// The current bump increment.
    pub fn increment(&self) -> f64 {
        self.increment
    }

    /// Moves `index` onto the heap, if not already present.
    pub fn push(&mut self, index: usize) {
        if self.position_in_heap[index].is_some() {
            return;
        }
        let heap_index = self.heap.len();
        self.heap.push(index);
        self.position_in_heap[index] = Some(heap_index);
        self.heapify_up(heap_index);
    }

    /// Peek at the index with maximum score.
    pub fn peek_max(&self) -> Option<usize> {
        self.heap.first().copied()
    }

    /// Pop the index with maximum score off the heap.
    pub fn pop_max(&mut self) -> Option<usize> {
        let max = *self.heap.first()?;
        let last = self.heap.pop()?;
        self.position_in_heap[max] = None;
        if last != max {
            self.heap[0] = last;
            self.position_in_heap[last] = Some(0);
            self.heapify_down(0);
        }
        Some(max)
    }

    /// Increases the score of `index` by the current increment, rescaling every score if the result exceeds `max_score`.
    pub fn bump(&mut self, index: usize, max_score: f64) {
        self.scores[index] += self.increment;
        if let Some(heap_index) = self.position_in_heap[index] {
            self.heapify_up(heap_index);
        }
        if self.scores[index] > max_score {
            self.rescale(max_score);
        }
    }

    /// Grows the increment, which amounts to decaying every score.
    pub fn decay(&mut self, decay: f64, max_score: f64) {
        self.increment *= 1.0 / decay;
        if self.increment > max_score {
            self.rescale(max_score);
        }
    }

    /// Divides every score, and the increment, by `factor`.
    ///
    /// As every score is divided by the same factor, the heap property is preserved.
    pub fn rescale(&mut self, factor: f64) {
        log::trace!("Rescaling scores by {factor}");
        for score in self.scores.iter_mut() {
            *score /= factor;
        }
        self.increment /= factor;
    }

    /// Rebuilds the heap from the indices for which `keep` holds, keeping all scores.
    pub fn rebuild(&mut self, keep: impl Fn(usize) -> bool) {
        self.heap.clear();
        self.position_in_heap.iter_mut().for_each(|position| *position = None);
        for index in 0..self.scores.len() {
            if keep(index) {
                self.push(index);
            }
        }
    }

    /// A heap over the indices which `map` sends somewhere, with scores and the increment carried over.
    ///
    /// Every mapped index is on the resulting heap.
    pub fn compacted(&self, map: &[u32], new_size: usize) -> Self {
        let mut compact = IndexHeap::new(new_size);
        compact.increment = self.increment;
        for (old_index, &new_index) in map.iter().enumerate() {
            if new_index == crate::structures::literal::INVALID {
                continue;
            }
            compact.scores[new_index as usize] = self.scores[old_index];
            compact.push(new_index as usize);
        }
        compact
    }
}

impl IndexHeap {
    fn heap_parent(heap_index: usize) -> usize {
        (heap_index - 1) / 2
    }

    fn swap_heap_indices(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.position_in_heap[self.heap[a]] = Some(a);
        self.position_in_heap[self.heap[b]] = Some(b);
    }

    /// Shuffles the index up the heap, swapping with its parent while the parent has a smaller score.
    fn heapify_up(&mut self, mut heap_index: usize) {
        while heap_index > 0 {
            let parent = Self::heap_parent(heap_index);
            if self.scores[self.heap[parent]] >= self.scores[self.heap[heap_index]] {
                break;
            }
            self.swap_heap_indices(heap_index, parent);
            heap_index = parent;
        }
    }

    /// Shuffles the index down the heap, swapping with the larger child while that child has a larger score.
    fn heapify_down(&mut self, mut heap_index: usize) {
        loop {
            let left = 2 * heap_index + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;

            let mut update = heap_index;
            if self.scores[self.heap[left]] > self.scores[self.heap[update]] {
                update = left;
            }
            if right < self.heap.len() && self.scores[self.heap[right]] > self.scores[self.heap[update]] {
                update = right;
            }

            if update == heap_index {
                break;
            }
            self.swap_heap_indices(heap_index, update);
            heap_index = update;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heap_with_scores(scores: &[f64]) -> IndexHeap {
        let mut heap = IndexHeap::new(scores.len());
        heap.scores.copy_from_slice(scores);
        for index in 0..scores.len() {
            heap.push(index);
        }
        heap
    }

    #[test]
    fn heap_simple() {
        let mut heap = heap_with_scores(&[70.0, 60.0, 0.0, 0.0, 30.0, 20.0, 10.0]);
        heap.pop_max();
        heap.pop_max();
        assert_eq!(heap.pop_max(), Some(4));
        assert_eq!(heap.pop_max(), Some(5));
        assert_eq!(heap.pop_max(), Some(6));
    }

    #[test]
    fn heap_bump_reorders() {
        let mut heap = heap_with_scores(&[3.0, 2.0, 1.0]);
        heap.increment = 5.0;
        heap.bump(2, 1e150);
        assert_eq!(heap.peek_max(), Some(2));
        assert_eq!(heap.score(2), 6.0);
    }

    #[test]
    fn heap_rescale_keeps_order() {
        let mut heap = heap_with_scores(&[1.0, 8.0, 4.0]);
        heap.increment = 4.0;
        heap.bump(0, 6.0);
        assert_eq!(heap.score(1), 8.0);

        heap.bump(0, 6.0);
        assert_eq!(heap.score(0), 1.5);
        assert_eq!(heap.increment(), 4.0 / 6.0);
        assert_eq!(heap.pop_max(), Some(0));
        assert_eq!(heap.pop_max(), Some(1));
        assert_eq!(heap.pop_max(), Some(2));
        assert_eq!(heap.pop_max(), None);
    }

    #[test]
    fn heap_compaction() {
        let heap = heap_with_scores(&[1.0, 9.0, 4.0, 7.0]);
        let map = [0, crate::structures::literal::INVALID, 1, 2];
        let mut compact = heap.compacted(&map, 3);
        assert_eq!(compact.size(), 3);
        assert_eq!(compact.pop_max(), Some(2));
        assert_eq!(compact.pop_max(), Some(1));
        assert_eq!(compact.pop_max(), Some(0));
    }
}
