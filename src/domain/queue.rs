use std::collections::VecDeque;

use super::event::PickEvent;

/// Cola FIFO acotada. Al llenarse descarta el evento más antiguo para
/// admitir el nuevo: se prefiere seguir vivo a no perder datos.
#[derive(Debug)]
pub struct EventQueue {
    items: VecDeque<PickEvent>,
    capacity: usize,
    dropped: u64,
}

impl EventQueue {
    /// `capacity` de cero se trata como uno.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Agrega al final. Devuelve el evento desalojado si la cola estaba llena.
    pub fn push(&mut self, event: PickEvent) -> Option<PickEvent> {
        let evicted = if self.items.len() >= self.capacity {
            self.dropped += 1;
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(event);
        evicted
    }

    /// Saca hasta `limit` eventos, del más antiguo al más nuevo.
    pub fn drain_oldest(&mut self, limit: usize) -> Vec<PickEvent> {
        let n = limit.min(self.items.len());
        self.items.drain(..n).collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total de eventos descartados por desborde desde la creación.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
