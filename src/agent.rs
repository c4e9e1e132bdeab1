use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

use crate::actions::{ActionRequest, ActionSchema};
use crate::planners::{DecisionContext, Policy};
use crate::state::{Session, TimeStep};

/// Owns a policy together with everything it needs across ticks: the
/// session schema, the per-episode session and the random source.
pub struct Agent {
    policy: Box<dyn Policy>,
    schema: ActionSchema,
    session: Session,
    rng: StdRng,
}

impl Agent {
    pub fn new(policy: Box<dyn Policy>, schema: ActionSchema, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            policy,
            schema,
            session: Session::new(),
            rng,
        }
    }

    pub fn name(&self) -> &'static str {
        self.policy.name()
    }

    pub fn policy(&self) -> &dyn Policy {
        self.policy.as_ref()
    }

    pub fn schema(&self) -> &ActionSchema {
        &self.schema
    }

    /// Replace the name table, typically with the one the bridge announced.
    pub fn set_schema(&mut self, schema: ActionSchema) {
        self.schema = schema;
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Start a new episode. Learned state inside the policy survives.
    pub fn reset(&mut self) {
        self.session = Session::new();
        self.policy.reset();
    }

    /// Decide the action for one tick. The result is always either no-op or
    /// a well-formed action that is legal in `step`'s observation.
    #[tracing::instrument(level = "debug", skip(self, step), fields(agent = self.policy.name()))]
    pub fn step(&mut self, step: &TimeStep) -> ActionRequest {
        if step.first() {
            debug!("First tick, resetting episode state");
            self.reset();
        }
        self.session.observe(&step.observation);

        let mut ctx = DecisionContext {
            observation: &step.observation,
            step_type: step.step_type,
            schema: &self.schema,
            session: &self.session,
            rng: &mut self.rng,
        };
        let request = self.policy.decide(&mut ctx);

        if !request.is_legal(&step.observation) {
            warn!("Dropping illegal action {}", request);
            return ActionRequest::no_op(&self.schema);
        }
        if !request.matches_signature() {
            warn!("Dropping malformed action {}", request);
            return ActionRequest::no_op(&self.schema);
        }
        request
    }
}
