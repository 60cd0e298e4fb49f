//! One polygon editing session per connected client.
//!
//! Text frames are `COMMAND` or `COMMAND:{json}`. An applied command answers
//! with a `COMMAND_RESULT:` frame, then the queued change events (if any),
//! then a fresh polygon snapshot. `PICK` answers with a single `PICK_RESULT:`.

use polygon_core::config::EditorConfig;
use polygon_core::polygon::{Constraint, ConstraintKind, Polygon, PolygonEvent, VertexId};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Malformed payload for {command}: {source}")]
    Malformed {
        command: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexId),

    #[error("{kind:?} constraint takes {expected} vertices, got {got}")]
    WrongArity { kind: ConstraintKind, expected: usize, got: usize },
}

impl CommandError {
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::Unknown(_) => "UNKNOWN_COMMAND",
            CommandError::Malformed { .. } => "MALFORMED_PAYLOAD",
            CommandError::UnknownVertex(_) => "UNKNOWN_VERTEX",
            CommandError::WrongArity { .. } => "WRONG_ARITY",
        }
    }
}

/// Format an error as a JSON message for the frontend
pub fn format_error(code: &str, message: &str, severity: &str) -> String {
    format!("ERROR_UPDATE:{}", json!({
        "code": code,
        "message": message,
        "severity": severity
    }))
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddVertex(Point),
    InsertVertex { at: Point, between: [VertexId; 2] },
    MoveVertex { id: VertexId, to: Point },
    RemoveVertex(Point),
    MovePolygon { dx: i32, dy: i32 },
    AddConstraint { kind: ConstraintKind, vertices: Vec<VertexId> },
    RemoveConstraint { vertices: Vec<VertexId> },
    AutoConstraints { enabled: bool },
    Close,
    Reset,
    Pick(Point),
}

fn payload<T: DeserializeOwned>(command: &'static str, json: Option<&str>) -> Result<T, CommandError> {
    serde_json::from_str(json.unwrap_or_default()).map_err(|source| CommandError::Malformed { command, source })
}

impl Command {
    pub fn parse(text: &str) -> Result<Self, CommandError> {
        let (name, json) = match text.split_once(':') {
            Some((name, json)) => (name, Some(json)),
            None => (text, None),
        };

        #[derive(Deserialize)]
        struct InsertCmd {
            x: i32,
            y: i32,
            between: [VertexId; 2],
        }

        #[derive(Deserialize)]
        struct MoveVertexCmd {
            id: VertexId,
            x: i32,
            y: i32,
        }

        #[derive(Deserialize)]
        struct MovePolygonCmd {
            dx: i32,
            dy: i32,
        }

        #[derive(Deserialize)]
        struct ConstraintCmd {
            kind: ConstraintKind,
            vertices: Vec<VertexId>,
        }

        #[derive(Deserialize)]
        struct VerticesCmd {
            vertices: Vec<VertexId>,
        }

        #[derive(Deserialize)]
        struct ToggleCmd {
            enabled: bool,
        }

        let command = match name {
            "ADD_VERTEX" => Command::AddVertex(payload("ADD_VERTEX", json)?),
            "INSERT_VERTEX" => {
                let cmd: InsertCmd = payload("INSERT_VERTEX", json)?;
                Command::InsertVertex { at: Point { x: cmd.x, y: cmd.y }, between: cmd.between }
            }
            "MOVE_VERTEX" => {
                let cmd: MoveVertexCmd = payload("MOVE_VERTEX", json)?;
                Command::MoveVertex { id: cmd.id, to: Point { x: cmd.x, y: cmd.y } }
            }
            "REMOVE_VERTEX" => Command::RemoveVertex(payload("REMOVE_VERTEX", json)?),
            "MOVE_POLYGON" => {
                let cmd: MovePolygonCmd = payload("MOVE_POLYGON", json)?;
                Command::MovePolygon { dx: cmd.dx, dy: cmd.dy }
            }
            "ADD_CONSTRAINT" => {
                let cmd: ConstraintCmd = payload("ADD_CONSTRAINT", json)?;
                Command::AddConstraint { kind: cmd.kind, vertices: cmd.vertices }
            }
            "REMOVE_CONSTRAINT" => {
                let cmd: VerticesCmd = payload("REMOVE_CONSTRAINT", json)?;
                Command::RemoveConstraint { vertices: cmd.vertices }
            }
            "AUTO_CONSTRAINTS" => {
                let cmd: ToggleCmd = payload("AUTO_CONSTRAINTS", json)?;
                Command::AutoConstraints { enabled: cmd.enabled }
            }
            "CLOSE" => Command::Close,
            "RESET" => Command::Reset,
            "PICK" => Command::Pick(payload("PICK", json)?),
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

pub struct EditorSession {
    id: Uuid,
    config: EditorConfig,
    polygon: Polygon,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            polygon: Polygon::new(config.clone()),
            config,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn snapshot_frame(&self) -> String {
        let json = serde_json::to_string(&self.polygon.snapshot()).unwrap_or("{}".to_string());
        format!("POLYGON_UPDATE:{}", json)
    }

    fn require(&self, id: VertexId) -> Result<(), CommandError> {
        if self.polygon.contains(id) {
            Ok(())
        } else {
            Err(CommandError::UnknownVertex(id))
        }
    }

    /// Apply a command and return the frames to send back, in order.
    pub fn apply(&mut self, command: Command) -> Result<Vec<String>, CommandError> {
        debug!(session = %self.id, ?command, "Applying command");

        let applied = match command {
            Command::AddVertex(p) => {
                let id = self.polygon.add_vertex(p.x, p.y);
                info!(session = %self.id, vertex = %id, "Added vertex at ({}, {})", p.x, p.y);
                true
            }
            Command::InsertVertex { at, between: [a, b] } => {
                self.require(a)?;
                self.require(b)?;
                self.polygon.insert_vertex(at.x, at.y, a, b).is_some()
            }
            Command::MoveVertex { id, to } => {
                self.require(id)?;
                self.polygon.set_vertex_position(id, to.x, to.y)
            }
            Command::RemoveVertex(p) => self.polygon.remove_vertex(p.x, p.y),
            Command::MovePolygon { dx, dy } => self.polygon.move_polygon(dx, dy).is_some(),
            Command::AddConstraint { kind, vertices } => {
                for id in &vertices {
                    self.require(*id)?;
                }
                let constraint = match (kind, vertices.as_slice()) {
                    (ConstraintKind::VerticalEdge, [a, b]) => Some(Constraint::vertical(*a, *b)),
                    (ConstraintKind::HorizontalEdge, [a, b]) => Some(Constraint::horizontal(*a, *b)),
                    (ConstraintKind::Angle, [a, m, b]) => Constraint::angle(&self.polygon, *a, *m, *b),
                    (ConstraintKind::Angle, _) => {
                        return Err(CommandError::WrongArity { kind, expected: 3, got: vertices.len() })
                    }
                    _ => return Err(CommandError::WrongArity { kind, expected: 2, got: vertices.len() }),
                };
                let added = constraint.map(|c| self.polygon.add_constraint(c)).unwrap_or(false);
                info!(session = %self.id, ?kind, added, "Constraint request");
                added
            }
            Command::RemoveConstraint { vertices } => self.polygon.remove_constraint(&vertices) > 0,
            Command::AutoConstraints { enabled } => {
                self.polygon.set_auto_constraints(enabled);
                info!(session = %self.id, enabled, "Auto constraints toggled");
                true
            }
            Command::Close => {
                self.polygon.set_closed();
                true
            }
            Command::Reset => {
                let auto = self.polygon.auto_constraints();
                self.polygon = Polygon::new(self.config.clone());
                self.polygon.set_auto_constraints(auto);
                info!(session = %self.id, "Polygon reset");
                true
            }
            Command::Pick(p) => {
                let vertex = self.polygon.vertex_at(p.x, p.y);
                let edge = self.polygon.edge_at(p.x, p.y).map(|(a, b)| [a, b]);
                return Ok(vec![format!("PICK_RESULT:{}", json!({ "vertex": vertex, "edge": edge }))]);
            }
        };

        let mut frames = vec![format!("COMMAND_RESULT:{}", json!({ "applied": applied }))];
        let events: Vec<PolygonEvent> = self.polygon.drain_events();
        if !events.is_empty() {
            let json = serde_json::to_string(&events).unwrap_or("[]".to_string());
            frames.push(format!("EVENTS:{}", json));
        }
        frames.push(self.snapshot_frame());
        Ok(frames)
    }
}
