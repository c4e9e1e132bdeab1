use std::fmt;

use crate::infra::Point;
use crate::state::{Observation, UnitTag};

use super::schema::{ActionSchema, ArgKind, FunctionId, FunctionName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectPointAct {
    Select,
    Toggle,
    SelectAllType,
    AddAllType,
}

impl SelectPointAct {
    pub fn index(&self) -> i64 {
        match self {
            SelectPointAct::Select => 0,
            SelectPointAct::Toggle => 1,
            SelectPointAct::SelectAllType => 2,
            SelectPointAct::AddAllType => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectWorker {
    Select,
    Add,
    SelectAll,
    AddAll,
}

impl SelectWorker {
    pub fn index(&self) -> i64 {
        match self {
            SelectWorker::Select => 0,
            SelectWorker::Add => 1,
            SelectWorker::SelectAll => 2,
            SelectWorker::AddAll => 3,
        }
    }
}

/// One positional argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Queued(bool),
    SelectPointAct(SelectPointAct),
    SelectAdd(bool),
    SelectWorker(SelectWorker),
    Screen(Point),
    Minimap(Point),
    World(Point),
    UnitTags(Vec<UnitTag>),
    TargetUnitTag(UnitTag),
}

impl Argument {
    /// Not queued: execute immediately.
    pub const NOW: Argument = Argument::Queued(false);

    pub fn kind(&self) -> ArgKind {
        match self {
            Argument::Queued(_) => ArgKind::Queued,
            Argument::SelectPointAct(_) => ArgKind::SelectPointAct,
            Argument::SelectAdd(_) => ArgKind::SelectAdd,
            Argument::SelectWorker(_) => ArgKind::SelectWorker,
            Argument::Screen(_) => ArgKind::Screen,
            Argument::Minimap(_) => ArgKind::Minimap,
            Argument::World(_) => ArgKind::World,
            Argument::UnitTags(_) => ArgKind::UnitTags,
            Argument::TargetUnitTag(_) => ArgKind::TargetUnitTag,
        }
    }

    /// Flat integer encoding used on the wire.
    pub fn values(&self) -> Vec<i64> {
        match self {
            Argument::Queued(queued) | Argument::SelectAdd(queued) => vec![*queued as i64],
            Argument::SelectPointAct(act) => vec![act.index()],
            Argument::SelectWorker(act) => vec![act.index()],
            Argument::Screen(p) | Argument::Minimap(p) | Argument::World(p) => {
                vec![p.x as i64, p.y as i64]
            }
            Argument::UnitTags(tags) => tags.iter().map(|&t| t as i64).collect(),
            Argument::TargetUnitTag(tag) => vec![*tag as i64],
        }
    }
}

/// The single action produced per tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub function: FunctionName,
    pub id: FunctionId,
    pub arguments: Vec<Argument>,
}

impl ActionRequest {
    pub fn no_op(schema: &ActionSchema) -> Self {
        Self {
            function: FunctionName::NoOp,
            id: schema.no_op_id(),
            arguments: Vec::new(),
        }
    }

    /// Resolve `function` through the session schema. Returns `None` when the
    /// bridge did not announce the function.
    pub fn call(
        schema: &ActionSchema,
        function: FunctionName,
        arguments: Vec<Argument>,
    ) -> Option<Self> {
        let id = schema.id(function)?;
        let request = Self {
            function,
            id,
            arguments,
        };
        debug_assert!(
            request.matches_signature(),
            "arguments of {} do not match its signature",
            function
        );
        Some(request)
    }

    /// Like [`ActionRequest::call`], but also requires the function to be in
    /// the observation's legal-action set.
    pub fn call_if_available(
        schema: &ActionSchema,
        observation: &Observation,
        function: FunctionName,
        arguments: Vec<Argument>,
    ) -> Option<Self> {
        Self::call(schema, function, arguments).filter(|r| observation.is_available(r.id))
    }

    pub fn is_no_op(&self) -> bool {
        self.function == FunctionName::NoOp
    }

    /// No-op is always legal; anything else must be in the legal-action set.
    pub fn is_legal(&self, observation: &Observation) -> bool {
        self.is_no_op() || observation.is_available(self.id)
    }

    pub fn matches_signature(&self) -> bool {
        let signature = self.function.signature();
        signature.len() == self.arguments.len()
            && signature
                .iter()
                .zip(&self.arguments)
                .all(|(kind, arg)| *kind == arg.kind())
    }

    pub fn argument(&self, kind: ArgKind) -> Option<&Argument> {
        self.arguments.iter().find(|a| a.kind() == kind)
    }

    /// First point-valued argument, whichever grid it is on.
    pub fn target_point(&self) -> Option<Point> {
        self.arguments.iter().find_map(|a| match a {
            Argument::Screen(p) | Argument::Minimap(p) | Argument::World(p) => Some(*p),
            _ => None,
        })
    }
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.arguments.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", arg.kind().as_str(), arg.values())?;
        }
        write!(f, ")")
    }
}
