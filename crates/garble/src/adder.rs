//! N-bit ripple-carry adder generator, used as a fixed workload by the
//! benches and the `gcaudit` tool.

use crate::circuit::{BooleanCircuit, CircuitError, Gate, TruthTable, WireId};

/// Widest adder [`ripple_carry_adder`] will build.
pub const MAX_ADDER_BITS: u32 = 1_000_000;

/// Generates an `n_bits` ripple-carry adder.
///
/// # Wire numbering
///
/// - Wires `0..n`: first operand, least significant bit first
/// - Wires `n..2n`: second operand
/// - Wire `2n`: carry in
/// - Wires `2n+1..`: gate outputs
///
/// Outputs are the `n` sum bits followed by the carry out. Each bit position
/// is a full adder of five gates:
///
/// ```text
/// half_sum   = a[i] XOR b[i]
/// sum[i]     = half_sum XOR carry[i]
/// half_carry = a[i] AND b[i]
/// carry_prop = half_sum AND carry[i]
/// carry[i+1] = half_carry XOR carry_prop
/// ```
///
/// Widths above [`MAX_ADDER_BITS`] are rejected with
/// [`CircuitError::TooWide`].
pub fn ripple_carry_adder(n_bits: u32) -> Result<BooleanCircuit, CircuitError> {
    if n_bits > MAX_ADDER_BITS {
        return Err(CircuitError::TooWide {
            bits: n_bits,
            max: MAX_ADDER_BITS,
        });
    }

    let n = n_bits;
    let mut gates = Vec::with_capacity(5 * n as usize);
    let mut outputs = Vec::with_capacity(n as usize + 1);
    let mut next_wire: WireId = 2 * n + 1;
    let mut carry: WireId = 2 * n;

    for i in 0..n {
        let (a, b) = (i, n + i);
        let half_sum = next_wire;
        let sum = next_wire + 1;
        let half_carry = next_wire + 2;
        let carry_prop = next_wire + 3;
        let carry_out = next_wire + 4;
        next_wire += 5;

        gates.extend([
            Gate::new(a, b, half_sum, TruthTable::XOR),
            Gate::new(half_sum, carry, sum, TruthTable::XOR),
            Gate::new(a, b, half_carry, TruthTable::AND),
            Gate::new(half_sum, carry, carry_prop, TruthTable::AND),
            Gate::new(half_carry, carry_prop, carry_out, TruthTable::XOR),
        ]);
        outputs.push(sum);
        carry = carry_out;
    }
    outputs.push(carry);

    Ok(BooleanCircuit::new(gates, (0..=2 * n).collect(), outputs))
}
