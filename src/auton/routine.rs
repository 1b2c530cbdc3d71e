//! Builds the autonomous routine from the match selection.
//!
//! Building happens in two passes. [`plan`] is a pure function from
//! [`RouteParameters`] and [`FeatureFlags`] to a list of [`RoutineStep`]s.
//! [`build`] then asks a [`RoutineTasks`] factory for a task per step and
//! assembles them into a [`TaskGroup`]. The factory is where hardware gets
//! attached, so the plan can be checked without any.

use std::fmt;

use log::{debug, info, warn};

use super::{RouteParameters, Strategy, catalog};
use crate::{
    command::{Mode, Task, TaskGroup},
    config::FeatureFlags,
    drivetrain::SharedDrivetrain,
    mechanisms::portcullis::{PortcullisMove, SharedPortcullis},
    motion::position::PositionDriveController,
};

/// One action in an autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    LauncherTravelPosition,
    LauncherNeutralPosition,
    PortcullisDown,
    PortcullisUp,
    /// Drive `distance` inches. `speed` is the catalog crossing speed.
    DriveStraight { distance: f64, speed: i32 },
    /// Turn in place. Negative is left.
    Rotate { degrees: f64 },
    AutoAimControl,
    VisionDriveAndAim,
    AimLauncher,
    LauncherGoToAngle { degrees: f64 },
    Launch,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::LauncherTravelPosition => write!(f, "launcher travel position"),
            Step::LauncherNeutralPosition => write!(f, "launcher neutral position"),
            Step::PortcullisDown => write!(f, "portcullis down"),
            Step::PortcullisUp => write!(f, "portcullis up"),
            Step::DriveStraight { distance, speed } => write!(f, "drive straight {distance}in @ {speed}"),
            Step::Rotate { degrees } => write!(f, "rotate {degrees}°"),
            Step::AutoAimControl => write!(f, "auto aim control"),
            Step::VisionDriveAndAim => write!(f, "vision drive and aim"),
            Step::AimLauncher => write!(f, "aim launcher"),
            Step::LauncherGoToAngle { degrees } => write!(f, "launcher go to {degrees}°"),
            Step::Launch => write!(f, "launch"),
        }
    }
}

/// A [`Step`] and how it attaches to the routine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutineStep {
    pub step: Step,
    pub mode: Mode,
}

impl RoutineStep {
    pub fn sequential(step: Step) -> Self { Self { step, mode: Mode::Sequential } }

    pub fn parallel(step: Step) -> Self { Self { step, mode: Mode::Parallel } }
}

/// Lays out the routine for `params` without creating any tasks.
///
/// Mechanism setup comes first (launcher, then portcullis, each only when
/// enabled), followed by the strategy's drive and shoot steps. An unknown
/// strategy adds nothing.
pub fn plan(params: RouteParameters, flags: FeatureFlags) -> Vec<RoutineStep> {
    let mut steps = Vec::new();

    if flags.launcher {
        steps.push(RoutineStep::sequential(if catalog::begin_launcher_travel_position(params.obstacle) {
            Step::LauncherTravelPosition
        } else {
            Step::LauncherNeutralPosition
        }));
    }

    if flags.portcullis {
        steps.push(RoutineStep::sequential(if catalog::begin_portcullis_down(params.obstacle) {
            Step::PortcullisDown
        } else {
            Step::PortcullisUp
        }));
    }

    let drive = Step::DriveStraight {
        distance: f64::from(catalog::base_distance_inches(params.obstacle))
            + catalog::distance_past_defense(params.position),
        speed:    catalog::base_speed(params.obstacle),
    };
    let rotate = Step::Rotate {
        degrees: catalog::turn_angle_degrees(params.position),
    };

    match params.strategy {
        Strategy::None => {}
        Strategy::DriveAcross => steps.push(RoutineStep::sequential(drive)),
        Strategy::DriveShootWithVision => {
            steps.extend(
                [drive, rotate, Step::AutoAimControl, Step::VisionDriveAndAim, Step::Launch]
                    .into_iter()
                    .map(RoutineStep::sequential),
            );
        }
        Strategy::DriveShootWithoutVision => {
            steps.push(RoutineStep::sequential(drive));
            steps.push(RoutineStep::sequential(rotate));
            if flags.launcher {
                steps.push(RoutineStep::parallel(Step::AimLauncher));
                steps.push(RoutineStep::sequential(Step::LauncherGoToAngle {
                    degrees: catalog::aim_angle_degrees(params.position),
                }));
                steps.push(RoutineStep::sequential(Step::Launch));
            }
        }
        Strategy::Unknown => warn!("Unknown autonomous strategy, routine will do nothing"),
    }

    steps
}

/// Creates the task that carries out a [`Step`].
pub trait RoutineTasks {
    fn task_for(&mut self, step: &Step) -> Box<dyn Task>;
}

/// Plans the routine for `params` and turns it into a task group.
pub fn build(params: RouteParameters, flags: FeatureFlags, tasks: &mut impl RoutineTasks) -> TaskGroup {
    info!("Building autonomous routine {} with {:?}", params, flags);

    let mut group = TaskGroup::new(format!("auton {params}"));
    for RoutineStep { step, mode } in plan(params, flags) {
        debug!("  {:?} {}", mode, step);
        group.push(tasks.task_for(&step), mode);
    }

    if group.is_empty() {
        info!("Autonomous routine is empty");
    }
    group
}

/// The robot's own task factory.
///
/// Straight drives run on the position drive controller and portcullis steps
/// on [`PortcullisMove`]. Everything else (turning, aiming, launching) is
/// delegated to `others`.
pub struct RobotTasks<O: RoutineTasks> {
    drivetrain: SharedDrivetrain,
    portcullis: Option<SharedPortcullis>,
    others:     O,
}

impl<O: RoutineTasks> RobotTasks<O> {
    pub fn new(drivetrain: SharedDrivetrain, portcullis: Option<SharedPortcullis>, others: O) -> Self {
        Self {
            drivetrain,
            portcullis,
            others,
        }
    }
}

impl<O: RoutineTasks> RoutineTasks for RobotTasks<O> {
    fn task_for(&mut self, step: &Step) -> Box<dyn Task> {
        match (step, &self.portcullis) {
            // The controller always drives at its fixed power; speed is informational.
            (Step::DriveStraight { distance, .. }, _) => {
                Box::new(PositionDriveController::new(self.drivetrain.clone(), *distance))
            }
            (Step::PortcullisDown, Some(portcullis)) => Box::new(PortcullisMove::down(portcullis.clone())),
            (Step::PortcullisUp, Some(portcullis)) => Box::new(PortcullisMove::up(portcullis.clone())),
            _ => self.others.task_for(step),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        auton::{ObstacleType, StartPosition},
        command::{Scheduler, SubsystemSet, TaskState},
        drivetrain::sim::SimDrivetrain,
    };

    fn close(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

    fn drive_of(step: &RoutineStep) -> (f64, i32) {
        match step.step {
            Step::DriveStraight { distance, speed } => (distance, speed),
            other => panic!("expected a drive step, got {other:?}"),
        }
    }

    /// Named no-op tasks that finish on their first tick.
    struct Named(String);

    impl Task for Named {
        fn name(&self) -> &str { &self.0 }

        fn execute(&mut self) {}

        fn is_finished(&self) -> bool { true }
    }

    #[derive(Default)]
    struct Recording {
        seen: Vec<Step>,
    }

    impl RoutineTasks for Recording {
        fn task_for(&mut self, step: &Step) -> Box<dyn Task> {
            self.seen.push(*step);
            Box::new(Named(step.to_string()))
        }
    }

    #[test]
    fn low_bar_drive_across() {
        let params = RouteParameters::new(ObstacleType::LowBar, Strategy::DriveAcross, StartPosition::Three);
        let steps = plan(params, FeatureFlags::default());

        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].mode, Mode::Sequential);
        let (distance, speed) = drive_of(&steps[0]);
        assert!(close(distance, 204.1));
        assert_eq!(speed, 30);
    }

    #[test]
    fn rock_wall_shoot_without_vision() {
        let params =
            RouteParameters::new(ObstacleType::RockWall, Strategy::DriveShootWithoutVision, StartPosition::Four);
        let steps = plan(params, FeatureFlags::new(true, false));

        assert_eq!(steps.len(), 6);
        assert_eq!(steps[0], RoutineStep::sequential(Step::LauncherNeutralPosition));
        let (distance, speed) = drive_of(&steps[1]);
        assert!(close(distance, 225.09));
        assert_eq!(speed, -75);
        assert_eq!(steps[2], RoutineStep::sequential(Step::Rotate { degrees: -13.12 }));
        assert_eq!(steps[3], RoutineStep::parallel(Step::AimLauncher));
        assert_eq!(steps[4], RoutineStep::sequential(Step::LauncherGoToAngle { degrees: 40.0 }));
        assert_eq!(steps[5], RoutineStep::sequential(Step::Launch));
    }

    #[test]
    fn shoot_without_launcher_only_drives_and_turns() {
        let params =
            RouteParameters::new(ObstacleType::Moat, Strategy::DriveShootWithoutVision, StartPosition::Two);
        let steps: Vec<Step> = plan(params, FeatureFlags::default()).into_iter().map(|s| s.step).collect();

        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[0], Step::DriveStraight { speed: 50, .. }));
        assert_eq!(steps[1], Step::Rotate { degrees: 41.08 });
    }

    #[test]
    fn vision_shot_is_all_sequential() {
        let params =
            RouteParameters::new(ObstacleType::Portcullis, Strategy::DriveShootWithVision, StartPosition::Five);
        let steps = plan(params, FeatureFlags::default());

        assert!(steps.iter().all(|s| s.mode == Mode::Sequential));
        let kinds: Vec<Step> = steps.iter().skip(1).map(|s| s.step).collect();
        assert_eq!(
            kinds,
            vec![Step::Rotate { degrees: -57.75 }, Step::AutoAimControl, Step::VisionDriveAndAim, Step::Launch]
        );
        let (distance, _) = drive_of(&steps[0]);
        assert!(close(distance, 224.97));
    }

    #[test]
    fn mechanism_setup_comes_first() {
        let low_bar = RouteParameters::new(ObstacleType::LowBar, Strategy::None, StartPosition::One);
        let steps: Vec<Step> = plan(low_bar, FeatureFlags::new(true, true)).into_iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![Step::LauncherTravelPosition, Step::PortcullisDown]);

        let moat = RouteParameters::new(ObstacleType::Moat, Strategy::None, StartPosition::One);
        let steps: Vec<Step> = plan(moat, FeatureFlags::new(false, true)).into_iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![Step::PortcullisUp]);
    }

    #[test]
    fn unknown_strategy_builds_an_empty_group() {
        let params = RouteParameters::new(ObstacleType::Moat, Strategy::Unknown, StartPosition::One);
        let mut factory = Recording::default();
        let group = build(params, FeatureFlags::default(), &mut factory);

        assert!(group.is_empty());
        assert!(factory.seen.is_empty());
        assert!(group.is_finished());
    }

    #[test]
    fn unknown_selections_use_catalog_defaults() {
        let params = RouteParameters::new(ObstacleType::Unknown, Strategy::DriveAcross, StartPosition::Unknown);
        let steps = plan(params, FeatureFlags::default());
        let (distance, speed) = drive_of(&steps[0]);
        assert!(close(distance, 215.0));
        assert_eq!(speed, 35);
    }

    #[test]
    fn build_keeps_plan_order_and_modes() {
        let params =
            RouteParameters::new(ObstacleType::RockWall, Strategy::DriveShootWithoutVision, StartPosition::Four);
        let flags = FeatureFlags::new(true, false);
        let mut factory = Recording::default();
        let group = build(params, flags, &mut factory);

        let expected: Vec<Step> = plan(params, flags).into_iter().map(|s| s.step).collect();
        assert_eq!(factory.seen, expected);

        let modes: Vec<Mode> = group.steps().map(|(_, mode)| mode).collect();
        assert_eq!(modes[3], Mode::Parallel);
        assert_eq!(modes.iter().filter(|m| **m == Mode::Parallel).count(), 1);
        assert_eq!(group.steps().last().map(|(name, _)| name), Some("launch"));
    }

    #[test]
    fn robot_tasks_drive_the_drivetrain() {
        let sim = crate::shared(SimDrivetrain::new(4).with_response(100.0));
        let drivetrain: SharedDrivetrain = sim.clone();
        let mut tasks = RobotTasks::new(drivetrain, None, Recording::default());

        let params = RouteParameters::new(ObstacleType::LowBar, Strategy::DriveAcross, StartPosition::Three);
        let group = build(params, FeatureFlags::default(), &mut tasks);
        assert!(tasks.others.seen.is_empty());
        assert!(group.requirements().contains(crate::command::Subsystem::Drivetrain));

        let mut scheduler = Scheduler::new();
        scheduler.schedule(Box::new(group));
        for _ in 0..200 {
            scheduler.run();
            if scheduler.active_count() == 0 {
                break;
            }
        }

        assert_eq!(scheduler.active_count(), 0);
        assert!(sim.borrow().stop_count() >= 1);
    }

    #[test]
    fn portcullis_steps_fall_through_without_hardware() {
        let drivetrain: SharedDrivetrain = crate::shared(SimDrivetrain::new(4));
        let mut tasks = RobotTasks::new(drivetrain, None, Recording::default());

        let task = tasks.task_for(&Step::PortcullisDown);
        assert_eq!(task.name(), "portcullis down");
        assert_eq!(task.requirements(), SubsystemSet::EMPTY);
        assert_eq!(tasks.others.seen, vec![Step::PortcullisDown]);

        let mut tracked = crate::command::Tracked::new(task);
        assert_eq!(tracked.tick(), TaskState::Finished);
    }
}
