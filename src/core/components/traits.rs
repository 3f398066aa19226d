/// Clocked model driven one active edge at a time
///
/// This is the seam between a model and whatever drives it. `check` tells
/// whether an edge would be accepted without touching state, `evaluate`
/// samples the inputs of one edge and advances state, and `output` observes
/// the registered outputs between edges without side effects.
pub trait EdgeTriggered {
    type Inputs;
    type Output;
    type Error;

    /// Validate the inputs of an edge without advancing the model.
    /// `evaluate` must succeed on the same state whenever this does.
    fn check(&self, inputs: &Self::Inputs) -> Result<(), Self::Error>;

    /// Advance the model by one active edge
    fn evaluate(&mut self, inputs: &Self::Inputs) -> Result<(), Self::Error>;

    /// Current registered output
    fn output(&self) -> Self::Output;
}
