/*!
A queue of variable indices, ordered by the time of their last bump.

The queue is the focused mode counterpart to the [score heap](crate::generic::index_heap), implementing the *variable move-to-front* heuristic:
- Each index is a link in a doubly linked list, and carries a *stamp*, which strictly increases from the first link to the last.
- Bumping an index moves it to the end of the queue with a fresh stamp.
- Decisions are made by walking backwards from the *search* link to the first unassigned index.

As unassigning an index never moves it, the search link only needs to be [updated](Queue::update_search) when an index with a later stamp than the current search link is unassigned.
*/

/// A link in the queue.
#[derive(Clone, Copy, Debug, Default)]
pub struct Link {
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub stamp: u64,
}

/// The queue struct.
#[derive(Clone, Debug, Default)]
pub struct Queue {
    links: Vec<Link>,
    first: Option<usize>,
    last: Option<usize>,
    search: Option<usize>,
    stamp: u64,
}

impl Queue {
    /// A queue of the indices `0..size`, in order.
    pub fn new(size: usize) -> Self {
        let mut queue = Queue {
            links: vec![Link::default(); size],
            ..Default::default()
        };
        for index in 0..size {
            queue.enqueue(index);
        }
        queue.reset_search();
        queue
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn stamp(&self, index: usize) -> u64 {
        self.links[index].stamp
    }

    pub fn search(&self) -> Option<usize> {
        self.search
    }

    pub fn link(&self, index: usize) -> &Link {
        &self.links[index]
    }

    /// Appends `index` to the end of the queue with a fresh stamp.
    fn enqueue(&mut self, index: usize) {
        self.stamp += 1;
        let link = &mut self.links[index];
        link.prev = self.last;
        link.next = None;
        link.stamp = self.stamp;
        match self.last {
            Some(last) => self.links[last].next = Some(index),
            None => self.first = Some(index),
        }
        self.last = Some(index);
    }

    /// Unlinks `index` from the queue.
    fn dequeue(&mut self, index: usize) {
        let Link { prev, next, .. } = self.links[index];
        match prev {
            Some(prev) => self.links[prev].next = next,
            None => self.first = next,
        }
        match next {
            Some(next) => self.links[next].prev = prev,
            None => self.last = prev,
        }
    }

    /// Moves `index` to the end of the queue.
    ///
    /// If `unassigned` the index becomes the search link, as it is now the latest unassigned index.
    pub fn move_to_front(&mut self, index: usize, unassigned: bool) {
        if self.last == Some(index) {
            return;
        }
        self.dequeue(index);
        self.enqueue(index);
        if unassigned {
            self.search = Some(index);
        }
    }

    /// Notes `index` has been unassigned, updating the search link if the index is later.
    pub fn update_search(&mut self, index: usize) {
        match self.search {
            Some(search) if self.links[search].stamp >= self.links[index].stamp => {}
            _ => self.search = Some(index),
        }
    }

    /// Resets the search link to the last index of the queue.
    pub fn reset_search(&mut self) {
        self.search = self.last;
    }

    /// Walks from the search link towards the front of the queue, returning the first index for which `assigned` fails.
    ///
    /// The search link is left on the returned index.
    pub fn next_unassigned(&mut self, assigned: impl Fn(usize) -> bool) -> Option<usize> {
        let mut search = self.search;
        while let Some(index) = search {
            if !assigned(index) {
                break;
            }
            search = self.links[index].prev;
        }
        self.search = search;
        search
    }

    /// A queue over the indices which `map` sends somewhere, in the same order, with fresh stamps.
    pub fn compacted(&self, map: &[u32], new_size: usize) -> Self {
        let mut compact = Queue {
            links: vec![Link::default(); new_size],
            ..Default::default()
        };
        let mut link = self.first;
        while let Some(old_index) = link {
            let new_index = map[old_index];
            if new_index != crate::structures::literal::INVALID {
                compact.enqueue(new_index as usize);
            }
            link = self.links[old_index].next;
        }
        compact.reset_search();
        compact
    }

    /// The indices of the queue, from first to last.
    pub fn order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.links.len());
        let mut link = self.first;
        while let Some(index) = link {
            order.push(index);
            link = self.links[index].next;
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_to_front_and_search() {
        let mut queue = Queue::new(4);
        assert_eq!(queue.order(), vec![0, 1, 2, 3]);

        queue.move_to_front(1, true);
        assert_eq!(queue.order(), vec![0, 2, 3, 1]);
        assert_eq!(queue.search(), Some(1));

        let assigned = [false, true, true, false];
        assert_eq!(queue.next_unassigned(|i| assigned[i]), Some(3));

        let assigned = [false, true, true, true];
        assert_eq!(queue.next_unassigned(|i| assigned[i]), Some(0));

        queue.update_search(2);
        assert_eq!(queue.search(), Some(2));
        queue.update_search(0);
        assert_eq!(queue.search(), Some(2));
    }

    #[test]
    fn stamps_increase() {
        let mut queue = Queue::new(3);
        queue.move_to_front(0, false);
        let order = queue.order();
        for pair in order.windows(2) {
            assert!(queue.stamp(pair[0]) < queue.stamp(pair[1]));
        }
    }

    #[test]
    fn compaction_keeps_order() {
        let mut queue = Queue::new(4);
        queue.move_to_front(0, false);
        let map = [0, crate::structures::literal::INVALID, 1, 2];
        let compact = queue.compacted(&map, 3);
        assert_eq!(compact.order(), vec![1, 2, 0]);
        assert_eq!(compact.search(), Some(0));
    }
}
