//! Master plans.
//!
//! Every player is dealt one secret long-running objective at game start.
//! Progress is fed by events derived from resolved rounds and freezes once
//! the plan completes.

pub mod catalog;
pub mod engine;
pub mod progress;

pub use catalog::{
    CompletionType, MasterPlan, PlanId, Reward, SpecialEffect, ALLIANCE_PLANS, BASE_PLANS,
    CATALOG,
};
pub use engine::{eligible_plans, CompletionResult, MasterPlanEngine, PlanInfo, PlayerPlan};
pub use progress::{PlanEvent, Progress, SPRING_ANVIL};
