use lazylower_core::{ops, Literal, LoweringContext, Output, PrimitiveType, Shape, TensorData};
use lazylower_emit::{
    ComputationEmitter, Emitter, EmitterConfig, GraphEmitter, OutputFormat, VerbosityLevel,
};
use pretty_assertions::assert_eq;

fn fenced_graph() -> Vec<Output> {
    let data = TensorData::new(
        Shape::array(PrimitiveType::F32, [2]),
        "CPU:0",
        vec![1.0, 2.0],
    )
    .into_ptr();
    let x = ops::device_data(data);
    let bias = ops::constant(Literal::vector(PrimitiveType::F32, vec![0.5, 0.5]));
    let sum = ops::add(x.clone(), bias);
    ops::optimization_barrier(vec![sum, x])
}

#[test]
fn test_emit_lowered_computation() {
    let outputs = fenced_graph();
    let mut loctx = LoweringContext::new("fenced");
    for output in &outputs {
        let op = loctx.get_output_op(output).unwrap();
        loctx.add_result(op);
    }
    let computation = loctx.build().unwrap();

    let text = ComputationEmitter::new(EmitterConfig::plain())
        .emit_to_string(&computation)
        .unwrap();

    assert_eq!(
        text,
        "HloModule fenced

ENTRY fenced {
  %0 = f32[2] parameter(0), name=\"param_0\"
  %1 = f32[2] constant({0.5, 0.5})
  %2 = f32[2] add(%0, %1)
  %3 = (f32[2], f32[2]) tuple(%2, %0)
  %4 = (f32[2], f32[2]) opt-barrier(%3)
  %5 = f32[2] get-tuple-element(%4), index=0
  %6 = f32[2] get-tuple-element(%4), index=1
  ROOT %7 = (f32[2], f32[2]) tuple(%5, %6)
}
"
    );
}

#[test]
fn test_emit_graph_snapshot() {
    let outputs = fenced_graph();
    let text = GraphEmitter::new(EmitterConfig::plain())
        .emit_to_string(&outputs)
        .unwrap();

    insta::assert_snapshot!(text, @r###"
    IR {
      %0 = f32[2] lazy::device_data(), device=CPU:0
      %1 = f32[2] lazy::constant(), value={0.5, 0.5}
      %2 = f32[2] lazy::binary(%0, %1), kind=add
      %3 = (f32[2], f32[2]) xla::optimization_barrier(%2, %0), ROOT=0, ROOT=1
    }
    "###);
}

#[test]
fn test_graph_operands_reference_slots() {
    let fenced = fenced_graph();
    let reuse = ops::add(fenced[0].clone(), fenced[1].clone());

    let text = GraphEmitter::new(EmitterConfig::plain())
        .emit_to_string(&[reuse])
        .unwrap();

    assert!(text.contains("%4 = f32[2] lazy::binary(%3.0, %3.1), kind=add, ROOT=0"));
}

#[test]
fn test_graph_without_types_and_with_locations() {
    let mut config = EmitterConfig::plain();
    config.show_shapes = false;
    config.show_locations = true;

    let x = ops::device_data(TensorData::zeros(Shape::scalar(PrimitiveType::F32)).into_ptr());
    let text = GraphEmitter::new(config).emit_to_string(&[x]).unwrap();

    assert!(text.contains("%0 = lazy::device_data(), device=CPU:0"));
    if lazylower_core::ir::IrDebugConfig::global().capture_frames {
        assert!(text.contains("location="));
        assert!(text.contains("emit_tests.rs"));
    }
}

#[test]
fn test_verbose_computation_prints_program_shape() {
    let mut loctx = LoweringContext::new("identity");
    let data = TensorData::zeros(Shape::array(PrimitiveType::S32, [3])).into_ptr();
    let param = loctx.get_parameter(&data);
    let computation = loctx.build_with_root(param).unwrap();

    let mut config = EmitterConfig::plain();
    config.verbosity = VerbosityLevel::Verbose;
    let text = ComputationEmitter::new(config)
        .emit_to_string(&computation)
        .unwrap();

    assert!(text.contains("// program shape: (param_0: s32[3]) -> s32[3]"));
    assert!(text.contains("ROOT %0 = s32[3] parameter(0), name=\"param_0\""));
}

#[test]
fn test_graph_json_output() {
    let outputs = fenced_graph();
    let json = GraphEmitter::new(EmitterConfig::plain())
        .with_format(OutputFormat::Json)
        .emit_to_string(&outputs)
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let nodes = value["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[3]["op"], "xla::optimization_barrier");
    assert_eq!(nodes[3]["roots"], serde_json::json!([0, 1]));
    assert_eq!(nodes[2]["operands"], serde_json::json!(["%0", "%1"]));
}
