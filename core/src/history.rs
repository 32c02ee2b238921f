use std::collections::VecDeque;

/// How many submitted queries the recent-searches list retains.
pub const RECENT_QUERY_CAPACITY: usize = 10;

/// Growable-array LIFO.
#[derive(Debug)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// FIFO over a ring buffer.
#[derive(Debug)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, item: T) {
        self.items.push_back(item);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::collections::vec_deque::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Browser-style back/forward history over submitted queries.
///
/// Submitting a new query discards the forward branch; going back pushes
/// the current query onto the forward stack, and going forward mirrors
/// that. Owned by one session, never shared.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    back: Stack<String>,
    forward: Stack<String>,
    current: Option<String>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly submitted query as the current position.
    pub fn visit(&mut self, query: &str) {
        if let Some(previous) = self.current.take() {
            self.back.push(previous);
        }
        self.forward.clear();
        self.current = Some(query.to_string());
    }

    /// Step back, returning the query that becomes current.
    pub fn go_back(&mut self) -> Option<&str> {
        let previous = self.back.pop()?;
        if let Some(current) = self.current.take() {
            self.forward.push(current);
        }
        self.current = Some(previous);
        self.current.as_deref()
    }

    /// Step forward, returning the query that becomes current.
    pub fn go_forward(&mut self) -> Option<&str> {
        let next = self.forward.pop()?;
        if let Some(current) = self.current.take() {
            self.back.push(current);
        }
        self.current = Some(next);
        self.current.as_deref()
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Bounded FIFO of the most recent submitted queries, for display only.
/// A query already present is not re-enqueued; the oldest entry is
/// evicted when the list is full.
#[derive(Debug)]
pub struct RecentQueries {
    queue: Queue<String>,
    capacity: usize,
}

impl RecentQueries {
    pub fn new() -> Self {
        Self::with_capacity(RECENT_QUERY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            queue: Queue::new(),
            capacity,
        }
    }

    pub fn record(&mut self, query: &str) {
        if self.queue.iter().any(|q| q == query) {
            return;
        }
        if self.queue.len() == self.capacity {
            self.queue.dequeue();
        }
        self.queue.enqueue(query.to_string());
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Default for RecentQueries {
    fn default() -> Self {
        Self::new()
    }
}
