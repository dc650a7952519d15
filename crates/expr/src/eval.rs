use std::collections::HashMap;

use crate::error::Result;
use crate::parser::Expression;

/// Evaluates an expression against numeric variable bindings.
///
/// Callers that evaluate one expression many times parse it once and use
/// [`Evaluate::evaluate_parsed`].
pub trait Evaluate {
    fn evaluate_parsed(
        &self,
        expression: &Expression,
        bindings: &HashMap<String, f64>,
    ) -> Result<f64>;

    fn evaluate(&self, expression: &str, bindings: &HashMap<String, f64>) -> Result<f64> {
        self.evaluate_parsed(&Expression::parse(expression)?, bindings)
    }
}

/// Default evaluator backed by [`Expression`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluate for ExpressionEvaluator {
    fn evaluate_parsed(
        &self,
        expression: &Expression,
        bindings: &HashMap<String, f64>,
    ) -> Result<f64> {
        expression.eval(bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprError;

    #[test]
    fn evaluates_with_bindings() {
        let bindings = HashMap::from([
            ("time".to_string(), 2.0),
            ("position".to_string(), 20.0),
        ]);
        let evaluator = ExpressionEvaluator::new();
        assert_eq!(
            evaluator.evaluate("10 * sqrt(2/10 * position)", &bindings),
            Ok(20.0)
        );
        assert_eq!(evaluator.evaluate("2 * time + 1", &bindings), Ok(5.0));
    }

    #[test]
    fn bindings_shadow_constants() {
        let bindings = HashMap::from([("e".to_string(), 1.0)]);
        assert_eq!(ExpressionEvaluator.evaluate("e + 1", &bindings), Ok(2.0));
    }

    #[test]
    fn parsed_expressions_can_be_reused() {
        let expression = Expression::parse("2 * x").unwrap();
        let results: Vec<f64> = [1.0, 2.5, -3.0]
            .into_iter()
            .map(|x| {
                let bindings = HashMap::from([("x".to_string(), x)]);
                ExpressionEvaluator.evaluate_parsed(&expression, &bindings).unwrap()
            })
            .collect();
        assert_eq!(results, vec![2.0, 5.0, -6.0]);
    }

    #[test]
    fn missing_binding_is_an_error() {
        let bindings = HashMap::new();
        assert_eq!(
            ExpressionEvaluator.evaluate("energy * 2", &bindings),
            Err(ExprError::UnknownVariable("energy".into()))
        );
    }
}
