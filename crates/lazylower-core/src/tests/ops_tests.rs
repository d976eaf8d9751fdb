use super::support::{f32_vec, Fault, Tracked};
use crate::builder::{BinaryOp, Opcode, UnaryOp};
use crate::data::TensorData;
use crate::ir::{Node, Output, OutputKey};
use crate::literal::Literal;
use crate::lowering::{lower_outputs, LoweringContext};
use crate::ops;
use crate::types::{PrimitiveType, Shape};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_optimization_barrier_shapes() {
    let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
    let n = ops::device_data(TensorData::zeros(Shape::scalar(PrimitiveType::S32)).into_ptr());
    let outputs = ops::optimization_barrier(vec![x, n]);

    assert_eq!(outputs.len(), 2);
    let node = &outputs[0].node;
    assert_eq!(node.num_outputs(), 2);
    assert_eq!(
        node.shape(),
        &Shape::tuple([f32_vec(2), Shape::scalar(PrimitiveType::S32)])
    );
    assert_eq!(outputs[0].shape(), &f32_vec(2));
    assert_eq!(outputs[1].shape(), &Shape::scalar(PrimitiveType::S32));
}

#[test]
fn test_single_input_barrier_slot_shape() {
    let x = ops::device_data(TensorData::zeros(f32_vec(5)).into_ptr());
    let outputs = ops::optimization_barrier(vec![x]);

    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].shape(), &f32_vec(5));
    assert_eq!(outputs[0].node.shape(), &Shape::tuple([f32_vec(5)]));
}

#[test]
fn test_optimization_barrier_lowering() {
    let data = TensorData::zeros(f32_vec(2)).into_ptr();
    let x = ops::device_data(Arc::clone(&data));
    let y = ops::unary(UnaryOp::Exp, x.clone());
    let outputs = ops::optimization_barrier(vec![x, y]);
    let mut loctx = LoweringContext::new("barrier");

    let first = loctx.get_output_op(&outputs[0]).unwrap();
    let traversals = loctx.stats().traversals;
    let second = loctx.get_output_op(&outputs[1]).unwrap();
    assert_eq!(loctx.stats().traversals, traversals);

    let barrier_id = outputs[0].node.id();
    assert!(loctx.is_lowered(&Output::new(Arc::clone(&outputs[0].node), 1)));
    assert_ne!(first, second);
    assert_eq!(
        loctx.builder().shape_of(second).unwrap(),
        f32_vec(2),
        "slot 1 of {}",
        OutputKey::new(barrier_id, 1)
    );

    loctx.add_result(first);
    loctx.add_result(second);
    let computation = loctx.build().unwrap();

    assert_eq!(computation.count_opcode("opt-barrier"), 1);
    assert_eq!(computation.count_opcode("get-tuple-element"), 2);
    assert_eq!(computation.count_opcode("tuple"), 2);
    assert_eq!(computation.parameter_count(), 1);

    let barrier = computation
        .instructions
        .iter()
        .find(|inst| inst.opcode == Opcode::OptimizationBarrier)
        .unwrap();
    let tuple = computation.instruction(barrier.operands[0]).unwrap();
    assert_eq!(tuple.opcode, Opcode::Tuple);
    assert_eq!(barrier.shape, tuple.shape);
}

#[test]
fn test_empty_barrier_is_unsupported() {
    let outputs = ops::optimization_barrier(Vec::new());
    assert!(outputs.is_empty());

    let node = ops::OptimizationBarrier::new(Vec::new());
    assert_eq!(node.num_outputs(), 0);
    let mut loctx = LoweringContext::new("empty_barrier");
    let err = node.lower(&mut loctx).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported: optimization barrier requires at least one input"
    );
    assert_eq!(loctx.builder().instruction_count(), 0);
}

#[test]
fn test_shared_data_becomes_one_parameter() {
    let data = TensorData::zeros(f32_vec(3)).into_ptr();
    let a = ops::device_data(Arc::clone(&data));
    let b = ops::device_data(Arc::clone(&data));
    let sum = ops::add(a, b);

    let lowered = lower_outputs("shared", &[sum]).unwrap();
    assert_eq!(lowered.parameters.len(), 1);
    assert!(Arc::ptr_eq(&lowered.parameters[0], &data));
    assert_eq!(lowered.computation.parameter_count(), 1);
    assert_eq!(lowered.result_shapes, vec![f32_vec(3)]);
}

#[test]
fn test_lower_outputs_roots_in_order() {
    let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
    let c = ops::constant(Literal::vector(PrimitiveType::F32, vec![1.0, 2.0]));
    let prod = ops::mul(x.clone(), c);
    let neg = ops::unary(UnaryOp::Negate, x);

    let lowered = lower_outputs("ordered", &[neg, prod]).unwrap();
    let root = lowered.computation.root_instruction().unwrap();
    assert_eq!(root.opcode, Opcode::Tuple);

    let kinds: Vec<&Opcode> = root
        .operands
        .iter()
        .map(|id| &lowered.computation.instruction(*id).unwrap().opcode)
        .collect();
    assert_eq!(
        kinds,
        vec![
            &Opcode::Unary(UnaryOp::Negate),
            &Opcode::Binary(BinaryOp::Multiply)
        ]
    );
}

#[test]
fn test_structural_hash() {
    let data = TensorData::zeros(f32_vec(2)).into_ptr();
    let x = ops::device_data(Arc::clone(&data));
    let a = ops::add(x.clone(), x.clone());
    let b = ops::add(x.clone(), x.clone());
    let c = ops::mul(x.clone(), x);

    assert_ne!(a.node.id(), b.node.id());
    assert_eq!(a.node.core().hash(), b.node.core().hash());
    assert_ne!(a.node.core().hash(), c.node.core().hash());
}

#[test]
fn test_clone_with_operands() {
    let x = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
    let y = ops::device_data(TensorData::zeros(f32_vec(2)).into_ptr());
    let barrier = ops::optimization_barrier(vec![x.clone()]);

    let cloned = barrier[0].node.clone_with_operands(vec![x, y]);
    assert_eq!(cloned.num_outputs(), 2);
    assert_eq!(cloned.op(), barrier[0].node.op());
    assert_ne!(cloned.id(), barrier[0].node.id());
}

#[test]
fn test_node_text() {
    let c = ops::constant(Literal::scalar(PrimitiveType::F32, 2.5));
    let text = c.node.to_string();
    assert_eq!(
        text,
        format!("lazy::constant, id={}, shape=f32[], value=2.5", c.node.id())
    );
}

#[test]
fn test_tuple_operand_is_invalid() {
    let (bundle, _) = Tracked::with_shape(
        "bundle",
        Vec::new(),
        Shape::tuple([f32_vec(2)]),
        Fault::None,
    );
    let whole = Output::new(bundle, 0);
    assert!(whole.shape().is_tuple());

    let neg = ops::unary(UnaryOp::Negate, whole);
    let mut loctx = LoweringContext::new("tuple_operand");
    let err = loctx.get_output_op(&neg).unwrap_err();
    assert_eq!(
        err.diagnostic().and_then(|d| d.error.as_deref()),
        Some("Invalid operand 0: negate expects an array, got (f32[2])")
    );
}
