//! Fraction Tutor - Adaptive Tutoring Simulation
//!
//! A tutor picks a question cell (format x difficulty), a simulated student
//! answers, and skill belief and engagement evolve step by step.

pub mod bank;
pub mod core;
pub mod env;
pub mod eval;
pub mod policy;
pub mod student;
