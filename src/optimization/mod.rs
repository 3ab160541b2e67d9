pub mod callback;
pub mod leaders;
pub mod problem;
pub mod solvers;

pub use callback::{CancellationToken, NoopCallback, ProgressLogger, TrajectoryFrame, TrajectoryRecorder};
pub use leaders::{Leader, LeaderSnapshot, PackLeaders, Rank, SwarmLeaders};
pub use problem::{FallibleProblem, FnProblem, Objective, Rastrigin, Rosenbrock, Sphere};
pub use solvers::{
    GenerationSnapshot, GreyWolfPack, GwoParams, Inertia, OptimizationCallback, ParticleSwarm, Progress,
    PsoParams, UpdateRule, build_rule,
};
