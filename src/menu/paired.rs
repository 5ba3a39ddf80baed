//! Key/value cursor pair moved in lock-step.
//!
//! The timer editor shows `KEY: VALUE` rows built from two cursors.  Both
//! are owned here and only ever moved together, and both are rebuilt from
//! one list of pairs, so they cannot drift apart in position or length.

use core::iter::Zip;

use super::cursor::{MenuCursor, Window};

/// Zipped visible window of a [`PairedCursor`].
pub type PairedWindow<'a, K, V> = Zip<Window<'a, K>, Window<'a, V>>;

#[derive(Debug, Clone)]
pub struct PairedCursor<K, V> {
    keys: MenuCursor<K>,
    values: MenuCursor<V>,
}

impl<K, V> PairedCursor<K, V> {
    pub fn new(pairs: impl IntoIterator<Item = (K, V)>, window: usize) -> Self {
        let (keys, values): (Vec<K>, Vec<V>) = pairs.into_iter().unzip();
        Self {
            keys: MenuCursor::new(keys, window),
            values: MenuCursor::new(values, window),
        }
    }

    pub fn keys(&self) -> &MenuCursor<K> {
        &self.keys
    }

    pub fn values(&self) -> &MenuCursor<V> {
        &self.values
    }

    pub fn current_line(&self) -> usize {
        self.keys.current_line()
    }

    pub fn shift(&self) -> usize {
        self.keys.shift()
    }

    /// Highlighted key and value.
    pub fn selected(&self) -> Option<(&K, &V)> {
        self.keys.selected().zip(self.values.selected())
    }

    pub fn show(&self) -> PairedWindow<'_, K, V> {
        self.keys.show().zip(self.values.show())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> PairedWindow<'_, K, V> {
        self.step_down();
        self.show()
    }

    pub fn previous(&mut self) -> PairedWindow<'_, K, V> {
        self.step_up();
        self.show()
    }

    pub fn step_down(&mut self) {
        self.keys.step_down();
        self.values.step_down();
    }

    pub fn step_up(&mut self) {
        self.keys.step_up();
        self.values.step_up();
    }

    /// Rebuild both lists from `pairs`, keeping the position where possible.
    pub fn update(&mut self, pairs: impl IntoIterator<Item = (K, V)>) {
        let (keys, values): (Vec<K>, Vec<V>) = pairs.into_iter().unzip();
        self.keys.update(keys);
        self.values.update(values);
        debug_assert_eq!(
            (self.keys.shift(), self.keys.current_line()),
            (self.values.shift(), self.values.current_line())
        );
    }
}
