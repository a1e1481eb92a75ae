pub mod accent;
pub mod phonetizer;
pub mod repertoire;
pub mod rhyme;
