//! Values paired with the hashing cost it took to produce them.

use crate::OperationCost;

/// Wrapped operation result with associated cost.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// Wrapped operation's return value.
    pub value: T,
    /// Cost of the operation.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Take wrapped value out adding its cost to provided accumulator.
    pub fn unwrap_add_cost(self, acc_cost: &mut OperationCost) -> T {
        *acc_cost += self.cost;
        self.value
    }

    /// Take wrapped value out dropping cost data.
    pub fn unwrap(self) -> T {
        self.value
    }

    /// Applies function to wrapped value keeping cost the same as before.
    pub fn map<B>(self, f: impl FnOnce(T) -> B) -> CostContext<B> {
        CostContext {
            value: f(self.value),
            cost: self.cost,
        }
    }
}

/// Type alias for `Result` wrapped into `CostContext`.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

impl<T, E> CostResult<T, E> {
    /// Applies function to wrapped value in case of `Ok` keeping cost the same
    /// as before.
    pub fn map_ok<B>(self, f: impl FnOnce(T) -> B) -> CostResult<B, E> {
        self.map(|result| result.map(f))
    }
}

/// Extension trait to add costs context to values.
pub trait CostsExt {
    /// Wraps any value into a `CostContext` object with provided costs.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self>
    where
        Self: Sized,
    {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}

/// Like `?` for `CostResult`: on error returns early with the costs
/// accumulated so far, on success yields the value and adds its cost to the
/// accumulator.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwrap_add_cost_accumulates() {
        let mut acc = OperationCost::with_hash_byte_calls(3);
        let value = 10u32
            .wrap_with_cost(OperationCost::with_hash_node_calls(4))
            .map(|x| x * 2)
            .unwrap_add_cost(&mut acc);
        assert_eq!(value, 20);
        assert_eq!(
            acc,
            OperationCost {
                hash_byte_calls: 3,
                hash_node_calls: 4,
            }
        );
    }

    #[test]
    fn test_map_ok_keeps_cost() {
        let initial: CostResult<u32, ()> =
            Ok(1).wrap_with_cost(OperationCost::with_hash_node_calls(1));
        let mapped = initial.map_ok(|x| x + 1);
        assert_eq!(mapped.value, Ok(2));
        assert_eq!(mapped.cost.hash_node_calls, 1);
    }

    #[test]
    fn test_cost_return_on_error_keeps_accumulated_cost() {
        fn leaf_then_fail() -> CostResult<u32, &'static str> {
            let mut cost = OperationCost::default();
            let a = cost_return_on_error!(
                &mut cost,
                Ok::<u32, &'static str>(1).wrap_with_cost(OperationCost::with_hash_byte_calls(1))
            );
            let b = cost_return_on_error!(
                &mut cost,
                Err::<u32, &'static str>("boom")
                    .wrap_with_cost(OperationCost::with_hash_node_calls(2))
            );
            Ok(a + b).wrap_with_cost(cost)
        }

        let result = leaf_then_fail();
        assert_eq!(result.value, Err("boom"));
        assert_eq!(result.cost.total_hash_calls(), 3);
    }
}
