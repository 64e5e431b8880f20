//! Fitness template
//!
//! Starting a workout is a network action; once it commits, the session's
//! one-second clock advances the workout timer until it is paused or
//! finished.

use std::collections::BTreeSet;

use serde_json::json;

use super::node::{ButtonStyle, Icon, PreviewNode, Tab};
use super::{Palette, PreviewAction, Reaction, Screen};
use crate::config::SimulatorConfig;
use crate::notify::Notification;

pub struct Workout {
    pub name: &'static str,
    pub minutes: u32,
    pub calories: u32,
    pub exercises: &'static [&'static str],
}

pub const WORKOUTS: &[Workout] = &[
    Workout {
        name: "Full Body HIIT",
        minutes: 30,
        calories: 320,
        exercises: &["Burpees", "Sentadillas con salto", "Flexiones", "Mountain climbers"],
    },
    Workout {
        name: "Fuerza tren superior",
        minutes: 45,
        calories: 280,
        exercises: &["Press de banca", "Remo con mancuerna", "Press militar"],
    },
    Workout {
        name: "Yoga matutino",
        minutes: 20,
        calories: 90,
        exercises: &["Saludo al sol", "Guerrero II", "Postura del niño"],
    },
];

const WEEKLY_MINUTES: [u32; 7] = [30, 45, 0, 20, 60, 35, 0];
const DAILY_STEPS_GOAL: u32 = 10_000;
const DAILY_STEPS: u32 = 7_842;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessTab {
    Today,
    Workouts,
    Progress,
}

impl FitnessTab {
    const ALL: [FitnessTab; 3] = [FitnessTab::Today, FitnessTab::Workouts, FitnessTab::Progress];

    fn label(&self) -> &'static str {
        match self {
            FitnessTab::Today => "Hoy",
            FitnessTab::Workouts => "Rutinas",
            FitnessTab::Progress => "Progreso",
        }
    }

    fn icon(&self) -> Icon {
        match self {
            FitnessTab::Today => Icon::Flame,
            FitnessTab::Workouts => Icon::Dumbbell,
            FitnessTab::Progress => Icon::Chart,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SelectTab(FitnessTab),
    /// Index into the workout catalog
    StartWorkout(usize),
    PauseWorkout,
    ResumeWorkout,
    FinishWorkout,
    ToggleExercise(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    StartWorkout(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveWorkout {
    index: usize,
    elapsed_seconds: u32,
    running: bool,
    completed: BTreeSet<usize>,
}

pub struct FitnessScreen {
    tab: FitnessTab,
    active: Option<ActiveWorkout>,
    finished: u32,
}

impl Default for FitnessScreen {
    fn default() -> Self {
        Self {
            tab: FitnessTab::Today,
            active: None,
            finished: 0,
        }
    }
}

impl FitnessScreen {
    #[cfg(test)]
    pub fn tab(&self) -> FitnessTab {
        self.tab
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|w| w.running)
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.active.as_ref().map_or(0, |w| w.elapsed_seconds)
    }

    /// Timer shown as `MM:SS`
    pub fn clock_label(&self) -> String {
        let seconds = self.elapsed_seconds();
        format!("{:02}:{:02}", seconds / 60, seconds % 60)
    }

    #[cfg(test)]
    pub fn completed_exercises(&self) -> usize {
        self.active.as_ref().map_or(0, |w| w.completed.len())
    }

    #[cfg(test)]
    pub fn finished_workouts(&self) -> u32 {
        self.finished
    }
}

fn fit(action: Action) -> PreviewAction {
    PreviewAction::Fitness(action)
}

impl Screen for FitnessScreen {
    type Action = Action;
    type Commit = Commit;

    fn handle(&mut self, action: Action) -> Reaction<Commit> {
        match action {
            Action::SelectTab(tab) if tab != self.tab => {
                self.tab = tab;
                Reaction::new("select_tab")
                    .navigation()
                    .payload(json!({ "tab": tab.label() }))
            }
            Action::StartWorkout(index) if index < WORKOUTS.len() && self.active.is_none() => {
                Reaction::new("start_workout")
                    .payload(json!({ "workout": WORKOUTS[index].name }))
                    .request(Commit::StartWorkout(index))
            }
            Action::PauseWorkout if self.is_running() => {
                if let Some(workout) = self.active.as_mut() {
                    workout.running = false;
                }
                Reaction::new("pause_workout").payload(json!({ "elapsedSeconds": self.elapsed_seconds() }))
            }
            Action::ResumeWorkout if self.active.as_ref().is_some_and(|w| !w.running) => {
                if let Some(workout) = self.active.as_mut() {
                    workout.running = true;
                }
                Reaction::new("resume_workout")
            }
            Action::FinishWorkout => match self.active.take() {
                Some(workout) => {
                    self.finished += 1;
                    Reaction::new("finish_workout")
                        .payload(json!({
                            "workout": WORKOUTS[workout.index].name,
                            "elapsedSeconds": workout.elapsed_seconds,
                            "completedExercises": workout.completed.len(),
                        }))
                        .notify(Notification::success("¡Entrenamiento completado!"))
                }
                None => Reaction::ignored(),
            },
            Action::ToggleExercise(exercise) => {
                let Some(workout) = self.active.as_mut() else {
                    return Reaction::ignored();
                };
                if exercise >= WORKOUTS[workout.index].exercises.len() {
                    return Reaction::ignored();
                }
                let done = workout.completed.insert(exercise);
                if !done {
                    workout.completed.remove(&exercise);
                }
                Reaction::new("toggle_exercise").payload(json!({ "exercise": exercise, "completed": done }))
            }
            _ => Reaction::ignored(),
        }
    }

    fn commit(&mut self, commit: Commit) -> Option<Notification> {
        match commit {
            Commit::StartWorkout(index) => {
                let workout = WORKOUTS.get(index)?;
                self.active = Some(ActiveWorkout {
                    index,
                    elapsed_seconds: 0,
                    running: true,
                    completed: BTreeSet::new(),
                });
                self.tab = FitnessTab::Workouts;
                Some(Notification::success(format!("{} iniciado", workout.name)))
            }
        }
    }

    fn wants_clock(&self) -> bool {
        self.is_running()
    }

    fn on_clock(&mut self) {
        if let Some(workout) = self.active.as_mut().filter(|w| w.running) {
            workout.elapsed_seconds += 1;
        }
    }

    fn render(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let header = PreviewNode::surface(
            palette.primary,
            vec![PreviewNode::row(vec![
                PreviewNode::image("logo", config.logo.as_deref(), Icon::Dumbbell, 28.0),
                PreviewNode::heading(&config.app_name, palette.on_primary),
            ])],
        );

        let body = match self.tab {
            FitnessTab::Today => self.render_today(config, palette),
            FitnessTab::Workouts => self.render_workouts(palette),
            FitnessTab::Progress => self.render_progress(palette),
        };

        let tabs = FitnessTab::ALL
            .iter()
            .map(|tab| Tab {
                label: tab.label().to_string(),
                icon: tab.icon(),
                action: fit(Action::SelectTab(*tab)),
                active: *tab == self.tab,
            })
            .collect();

        PreviewNode::column(vec![header, body, PreviewNode::TabBar(tabs)])
    }
}

impl FitnessScreen {
    fn render_today(&self, config: &SimulatorConfig, palette: &Palette) -> PreviewNode {
        let steps = DAILY_STEPS as f32 / DAILY_STEPS_GOAL as f32;
        PreviewNode::column(vec![
            PreviewNode::image("banner", config.custom_image("banner"), Icon::Flame, 100.0),
            PreviewNode::heading("Resumen de hoy", palette.text),
            PreviewNode::row(vec![
                PreviewNode::tinted_icon(Icon::Flame, palette.secondary),
                PreviewNode::strong(format!("{DAILY_STEPS} pasos")),
                PreviewNode::muted(format!("Meta: {DAILY_STEPS_GOAL}")),
            ]),
            PreviewNode::Progress { fraction: steps, color: palette.secondary },
            PreviewNode::row(vec![
                PreviewNode::strong(format!("{} entrenamientos", self.finished)),
                PreviewNode::muted("completados hoy"),
            ]),
            PreviewNode::button(
                "Comenzar entrenamiento",
                fit(Action::StartWorkout(0)),
                ButtonStyle::Filled(palette.primary),
            )
            .enabled(self.active.is_none()),
        ])
    }

    fn render_workouts(&self, palette: &Palette) -> PreviewNode {
        let Some(workout) = &self.active else {
            let mut children = vec![PreviewNode::heading("Rutinas", palette.text)];
            for (index, w) in WORKOUTS.iter().enumerate() {
                children.push(PreviewNode::surface(
                    palette.surface,
                    vec![
                        PreviewNode::strong(w.name),
                        PreviewNode::muted(format!("{} min · {} kcal", w.minutes, w.calories)),
                        PreviewNode::icon_button(Icon::Play, "Empezar", fit(Action::StartWorkout(index))),
                    ],
                ));
            }
            return PreviewNode::column(children);
        };

        let plan = &WORKOUTS[workout.index];
        let mut children = vec![
            PreviewNode::heading(plan.name, palette.text),
            PreviewNode::row(vec![PreviewNode::icon(Icon::Clock), PreviewNode::strong(self.clock_label())]),
            PreviewNode::Progress {
                fraction: workout.completed.len() as f32 / plan.exercises.len().max(1) as f32,
                color: palette.primary,
            },
        ];
        for (index, exercise) in plan.exercises.iter().enumerate() {
            let icon = if workout.completed.contains(&index) { Icon::Check } else { Icon::Dumbbell };
            children.push(PreviewNode::icon_button(icon, *exercise, fit(Action::ToggleExercise(index))));
        }
        let toggle = if workout.running {
            PreviewNode::icon_button(Icon::Pause, "Pausar", fit(Action::PauseWorkout))
        } else {
            PreviewNode::icon_button(Icon::Play, "Reanudar", fit(Action::ResumeWorkout))
        };
        children.push(PreviewNode::row(vec![
            toggle,
            PreviewNode::button("Terminar", fit(Action::FinishWorkout), ButtonStyle::Filled(palette.danger)),
        ]));
        PreviewNode::column(children)
    }

    fn render_progress(&self, palette: &Palette) -> PreviewNode {
        let days = ["L", "M", "X", "J", "V", "S", "D"];
        let max = WEEKLY_MINUTES.iter().copied().max().unwrap_or(1).max(1);
        let mut children = vec![PreviewNode::heading("Esta semana", palette.text)];
        for (day, minutes) in days.iter().zip(WEEKLY_MINUTES) {
            children.push(PreviewNode::row(vec![
                PreviewNode::muted(*day),
                PreviewNode::Progress { fraction: minutes as f32 / max as f32, color: palette.primary },
                PreviewNode::muted(format!("{minutes} min")),
            ]));
        }
        let total: u32 = WEEKLY_MINUTES.iter().sum();
        children.push(PreviewNode::strong(format!("Total: {total} minutos")));
        PreviewNode::column(children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started() -> FitnessScreen {
        let mut screen = FitnessScreen::default();
        let commit = screen.handle(Action::StartWorkout(1)).request.expect("start is a network action");
        screen.commit(commit);
        screen
    }

    #[test]
    fn test_clock_runs_only_while_started() {
        let mut screen = FitnessScreen::default();
        assert!(!screen.wants_clock());
        screen.on_clock();
        assert_eq!(screen.elapsed_seconds(), 0);

        let mut screen = started();
        assert!(screen.wants_clock());
        for _ in 0..75 {
            screen.on_clock();
        }
        assert_eq!(screen.clock_label(), "01:15");
    }

    #[test]
    fn test_pause_and_resume() {
        let mut screen = started();
        screen.on_clock();
        screen.handle(Action::PauseWorkout);
        assert!(!screen.wants_clock());
        screen.on_clock();
        assert_eq!(screen.elapsed_seconds(), 1);

        assert!(screen.handle(Action::PauseWorkout).event.is_none());
        screen.handle(Action::ResumeWorkout);
        screen.on_clock();
        assert_eq!(screen.elapsed_seconds(), 2);
    }

    #[test]
    fn test_completed_exercises_toggle() {
        let mut screen = started();
        screen.handle(Action::ToggleExercise(0));
        screen.handle(Action::ToggleExercise(2));
        screen.handle(Action::ToggleExercise(0));
        assert_eq!(screen.completed_exercises(), 1);
        assert!(screen.handle(Action::ToggleExercise(9)).event.is_none());
    }

    #[test]
    fn test_finish_resets_and_counts() {
        let mut screen = started();
        let reaction = screen.handle(Action::FinishWorkout);
        assert!(reaction.notice.is_some());
        assert_eq!(screen.finished_workouts(), 1);
        assert!(!screen.is_running());
        assert!(screen.handle(Action::FinishWorkout).event.is_none());
    }

    #[test]
    fn test_cannot_start_twice() {
        let mut screen = started();
        assert!(screen.handle(Action::StartWorkout(0)).request.is_none());
    }
}
