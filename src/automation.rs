//! WhatsApp automation flow editor model
//!
//! Flows are edited in memory and can be dry-run against an incoming message.
//! Nothing is ever sent; [`Flow::simulate`] only produces a transcript.

use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Bot sends `content`
    Message,
    /// Bot asks `content` and waits for the reply
    Question,
    /// Pause of `content` seconds
    Delay,
    /// Continue only if the incoming message contains `content`
    Condition,
    /// Hand the chat to a human agent; ends the flow
    Handoff,
}

impl StepKind {
    pub const ALL: [StepKind; 5] = [
        StepKind::Message,
        StepKind::Question,
        StepKind::Delay,
        StepKind::Condition,
        StepKind::Handoff,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StepKind::Message => "Mensaje",
            StepKind::Question => "Pregunta",
            StepKind::Delay => "Espera",
            StepKind::Condition => "Condición",
            StepKind::Handoff => "Pasar a agente",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    pub id: u32,
    pub kind: StepKind,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Incoming message contains the keyword (case-insensitive)
    Keyword(String),
    /// Every incoming message
    AnyMessage,
}

impl Trigger {
    pub fn matches(&self, incoming: &str) -> bool {
        match self {
            Trigger::Keyword(keyword) => {
                let keyword = keyword.trim().to_lowercase();
                !keyword.is_empty() && incoming.to_lowercase().contains(&keyword)
            }
            Trigger::AnyMessage => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Customer,
    Bot,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
}

impl TranscriptLine {
    fn new(speaker: Speaker, text: impl Into<String>) -> Self {
        Self { speaker, text: text.into() }
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.speaker {
            Speaker::Customer => "Cliente",
            Speaker::Bot => "Bot",
            Speaker::System => "Sistema",
        };
        write!(f, "{who}: {}", self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flow {
    pub name: String,
    pub trigger: Trigger,
    pub active: bool,
    steps: Vec<FlowStep>,
    next_id: u32,
}

impl Flow {
    pub fn new(name: impl Into<String>, trigger: Trigger) -> Self {
        Self {
            name: name.into(),
            trigger,
            active: true,
            steps: Vec::new(),
            next_id: 1,
        }
    }

    /// Greeting flow shown when the editor opens
    pub fn welcome() -> Self {
        let mut flow = Flow::new("Bienvenida", Trigger::Keyword("hola".to_string()));
        flow.add_step(StepKind::Message, "¡Hola! Gracias por escribirnos 👋");
        flow.add_step(StepKind::Question, "¿En qué podemos ayudarte hoy?");
        flow.add_step(StepKind::Delay, "2");
        flow.add_step(StepKind::Condition, "precio");
        flow.add_step(StepKind::Message, "Te enviamos nuestro catálogo de precios.");
        flow.add_step(StepKind::Handoff, "");
        flow
    }

    pub fn steps(&self) -> &[FlowStep] {
        &self.steps
    }

    pub fn add_step(&mut self, kind: StepKind, content: impl Into<String>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.steps.push(FlowStep { id, kind, content: content.into() });
        id
    }

    pub fn remove_step(&mut self, id: u32) -> bool {
        let before = self.steps.len();
        self.steps.retain(|step| step.id != id);
        self.steps.len() != before
    }

    pub fn update_step(&mut self, id: u32, kind: StepKind, content: impl Into<String>) -> bool {
        match self.steps.iter_mut().find(|step| step.id == id) {
            Some(step) => {
                step.kind = kind;
                step.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Drag-and-drop reorder: `to` is the insertion point before the item is removed
    pub fn move_step(&mut self, from: usize, to: usize) -> bool {
        if from >= self.steps.len() {
            return false;
        }
        let to = if from < to { to - 1 } else { to };
        if from == to {
            return false;
        }
        let step = self.steps.remove(from);
        let index = to.min(self.steps.len());
        self.steps.insert(index, step);
        debug!(flow = %self.name, from, to = index, "Moved flow step");
        true
    }

    /// Dry run against one incoming message
    pub fn simulate(&self, incoming: &str) -> Vec<TranscriptLine> {
        let mut transcript = vec![TranscriptLine::new(Speaker::Customer, incoming)];

        if !self.active {
            transcript.push(TranscriptLine::new(Speaker::System, "El flujo está desactivado"));
            return transcript;
        }
        if !self.trigger.matches(incoming) {
            transcript.push(TranscriptLine::new(Speaker::System, "El mensaje no activa este flujo"));
            return transcript;
        }

        for step in &self.steps {
            match step.kind {
                StepKind::Message => transcript.push(TranscriptLine::new(Speaker::Bot, step.content.clone())),
                StepKind::Question => {
                    transcript.push(TranscriptLine::new(Speaker::Bot, step.content.clone()));
                    transcript.push(TranscriptLine::new(Speaker::System, "(esperando respuesta)"));
                }
                StepKind::Delay => {
                    let seconds = step.content.trim().parse::<u32>().unwrap_or(0);
                    transcript.push(TranscriptLine::new(Speaker::System, format!("⏱ Espera de {seconds} s")));
                }
                StepKind::Condition => {
                    let keyword = step.content.trim().to_lowercase();
                    if !incoming.to_lowercase().contains(&keyword) {
                        transcript.push(TranscriptLine::new(
                            Speaker::System,
                            format!("Condición \"{keyword}\" no cumplida, fin del flujo"),
                        ));
                        break;
                    }
                }
                StepKind::Handoff => {
                    transcript.push(TranscriptLine::new(Speaker::System, "Conversación transferida a un agente"));
                    break;
                }
            }
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(flow: &Flow) -> Vec<String> {
        flow.steps().iter().map(|s| s.content.clone()).collect()
    }

    fn abc() -> Flow {
        let mut flow = Flow::new("t", Trigger::AnyMessage);
        for content in ["a", "b", "c"] {
            flow.add_step(StepKind::Message, content);
        }
        flow
    }

    #[test]
    fn test_move_down_and_up() {
        let mut flow = abc();
        // Drop "a" below "b": insertion point 2 before removal
        assert!(flow.move_step(0, 2));
        assert_eq!(labels(&flow), vec!["b", "a", "c"]);

        // Drop "c" at the top
        assert!(flow.move_step(2, 0));
        assert_eq!(labels(&flow), vec!["c", "b", "a"]);

        // Drop onto the empty area past the end
        assert!(flow.move_step(0, 3));
        assert_eq!(labels(&flow), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_move_onto_itself_is_noop() {
        let mut flow = abc();
        assert!(!flow.move_step(1, 1));
        assert!(!flow.move_step(1, 2));
        assert!(!flow.move_step(7, 0));
        assert_eq!(labels(&flow), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_ids_survive_removal() {
        let mut flow = abc();
        let id = flow.steps()[1].id;
        assert!(flow.remove_step(id));
        assert!(!flow.remove_step(id));
        let new_id = flow.add_step(StepKind::Delay, "5");
        assert_ne!(new_id, id);
        assert!(flow.update_step(new_id, StepKind::Delay, "10"));
        assert_eq!(flow.steps().last().map(|s| s.content.as_str()), Some("10"));
    }

    #[test]
    fn test_simulate_welcome_flow() {
        let flow = Flow::welcome();
        let transcript = flow.simulate("Hola, ¿cuál es el precio?");
        let text: Vec<String> = transcript.iter().map(ToString::to_string).collect();
        assert_eq!(text[0], "Cliente: Hola, ¿cuál es el precio?");
        assert!(text.contains(&"Bot: Te enviamos nuestro catálogo de precios.".to_string()));
        assert_eq!(text.last().map(String::as_str), Some("Sistema: Conversación transferida a un agente"));
    }

    #[test]
    fn test_condition_stops_flow() {
        let flow = Flow::welcome();
        let transcript = flow.simulate("hola");
        assert!(transcript.iter().all(|line| !line.text.contains("catálogo")));
        assert!(transcript.last().is_some_and(|line| line.text.contains("no cumplida")));
    }

    #[test]
    fn test_inactive_or_unmatched_flow_does_nothing() {
        let mut flow = Flow::welcome();
        assert_eq!(flow.simulate("buenas tardes").len(), 2);
        flow.active = false;
        let transcript = flow.simulate("hola");
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].speaker, Speaker::System);
    }
}
