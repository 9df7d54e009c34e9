pub mod assemble;
pub mod coaching;
pub mod context;
pub mod extract;
pub mod outlet;
pub mod prompt;
pub mod split;
pub mod workflow;
