use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emittable, Emitter, LineStyle};
use crate::output::{JsonFormatter, OutputFormat};
use lazylower_core::builder::{Computation, HloInstruction};
use std::io::Write;

/// Writes a [`Computation`] as HLO-style module text, or as JSON.
pub struct ComputationEmitter {
    config: EmitterConfig,
    format: OutputFormat,
}

impl ComputationEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self {
            config,
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn emit_text<W: Write>(
        &self,
        computation: &Computation,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        EmitHelper::plain(writer, context, &format!("HloModule {}", computation.name))?;
        writeln!(writer)?;

        if self.config.program_shape_enabled() {
            EmitHelper::comment(
                writer,
                context,
                &format!("program shape: {}", computation.program_shape),
            )?;
        }
        if self.config.ids_enabled() {
            EmitHelper::comment(
                writer,
                context,
                &format!("fingerprint: {}", computation.fingerprint()),
            )?;
        }

        let with_shapes = self.config.shapes_enabled();
        let header = format!("ENTRY {}", computation.name);
        EmitHelper::block(writer, context, &header, |w, c| {
            for inst in &computation.instructions {
                let text = instruction_text(inst, with_shapes);
                if inst.id == computation.root {
                    EmitHelper::line(w, c, LineStyle::Root, &format!("ROOT {}", text))?;
                } else if inst.is_parameter() {
                    EmitHelper::line(w, c, LineStyle::Parameter, &text)?;
                } else {
                    EmitHelper::plain(w, c, &text)?;
                }
            }
            Ok(())
        })
    }
}

impl Default for ComputationEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for ComputationEmitter {
    type Item = Computation;

    fn emit<W: Write>(
        &self,
        computation: &Computation,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        match self.format {
            OutputFormat::Text => self.emit_text(computation, writer, context),
            OutputFormat::Json => JsonFormatter::format_object(writer, computation),
        }
    }

    fn config(&self) -> &EmitterConfig {
        &self.config
    }
}

impl Emittable for HloInstruction {
    fn emit<W: Write>(&self, writer: &mut W, context: &mut EmitContext) -> EmitResult {
        EmitHelper::plain(writer, context, &instruction_text(self, true))
    }
}

/// One instruction line, e.g. `%2 = f32[4] add(%0, %1)`.
pub fn instruction_text(inst: &HloInstruction, with_shape: bool) -> String {
    if with_shape {
        inst.to_string()
    } else {
        format!("{} = {}{}", inst.id, inst.opcode.name(), inst.arguments())
    }
}
