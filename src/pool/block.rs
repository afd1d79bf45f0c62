//! Simulated allocation unit

/// A live heap allocation with a step-based lifetime
///
/// The payload is a real zero-filled heap buffer of `size` bytes, so creating
/// and dropping blocks exercises the host allocator.
#[derive(Debug)]
pub struct Block {
    data: Vec<u8>,
    ttl: i64,
    ttl_original: i64,
}

impl Block {
    /// Allocate a block of `size` bytes living `ttl` steps (`< 0` = immortal)
    pub fn new(size: usize, ttl: i64) -> Self {
        Self {
            data: vec![0; size],
            ttl,
            ttl_original: ttl,
        }
    }

    /// Size in bytes
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Remaining steps
    #[inline]
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Lifetime the block was created with
    #[inline]
    pub fn ttl_original(&self) -> i64 {
        self.ttl_original
    }

    /// Age by one step; immortal and dead blocks are unchanged
    #[inline]
    pub fn tick(&mut self) {
        if self.ttl > 0 {
            self.ttl -= 1;
        }
    }

    /// `true` once a mortal block has run out of steps
    #[inline]
    pub fn is_dead(&self) -> bool {
        self.ttl == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_buffer() {
        let block = Block::new(64, 3);
        assert_eq!(block.size(), 64);
        assert!(block.as_slice().iter().all(|b| *b == 0));
        assert_eq!(block.ttl_original(), 3);
    }

    #[test]
    fn test_tick_to_death() {
        let mut block = Block::new(8, 2);
        block.tick();
        assert_eq!(block.ttl(), 1);
        assert!(!block.is_dead());
        block.tick();
        assert!(block.is_dead());
        block.tick();
        assert_eq!(block.ttl(), 0);
        assert_eq!(block.ttl_original(), 2);
    }

    #[test]
    fn test_immortal_never_ticks() {
        let mut block = Block::new(8, -1);
        for _ in 0..100 {
            block.tick();
        }
        assert_eq!(block.ttl(), -1);
        assert!(!block.is_dead());
    }
}
