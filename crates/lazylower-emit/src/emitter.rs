use crate::config::EmitterConfig;
use anyhow::Result;
use colored::Colorize;
use std::io::Write;

pub type EmitResult = Result<()>;

/// Indentation and color state threaded through one emission.
#[derive(Debug, Clone)]
pub struct EmitContext {
    pub depth: usize,
    pub indent_unit: String,
    pub use_colors: bool,
}

impl EmitContext {
    pub fn new(config: &EmitterConfig) -> Self {
        Self {
            depth: 0,
            indent_unit: config.indent.to_string(),
            use_colors: config.colors,
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    pub fn dedent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn prefix(&self) -> String {
        self.indent_unit.repeat(self.depth)
    }

    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self.clone()
        }
    }
}

impl Default for EmitContext {
    fn default() -> Self {
        Self::new(&EmitterConfig::default())
    }
}

/// How a line is highlighted when colors are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Plain,
    Root,
    Parameter,
    Comment,
}

impl LineStyle {
    fn paint(self, text: &str) -> String {
        match self {
            LineStyle::Plain => text.to_string(),
            LineStyle::Root => text.bright_green().bold().to_string(),
            LineStyle::Parameter => text.cyan().to_string(),
            LineStyle::Comment => text.green().to_string(),
        }
    }
}

pub trait Emitter {
    type Item: ?Sized;

    fn emit<W: Write>(
        &self,
        item: &Self::Item,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult;

    fn config(&self) -> &EmitterConfig;

    fn emit_to_string(&self, item: &Self::Item) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = EmitContext::new(self.config());
        self.emit(item, &mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Something that prints itself without an emitter, e.g. a single instruction.
pub trait Emittable {
    fn emit<W: Write>(&self, writer: &mut W, context: &mut EmitContext) -> EmitResult;

    fn to_formatted_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut context = EmitContext::new(&EmitterConfig::plain());
        self.emit(&mut buffer, &mut context)?;
        Ok(String::from_utf8(buffer)?)
    }
}

pub struct EmitHelper;

impl EmitHelper {
    pub fn line<W: Write>(
        writer: &mut W,
        context: &EmitContext,
        style: LineStyle,
        text: &str,
    ) -> EmitResult {
        if context.use_colors && style != LineStyle::Plain {
            writeln!(writer, "{}{}", context.prefix(), style.paint(text))?;
        } else {
            writeln!(writer, "{}{}", context.prefix(), text)?;
        }
        Ok(())
    }

    pub fn plain<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        Self::line(writer, context, LineStyle::Plain, text)
    }

    pub fn comment<W: Write>(writer: &mut W, context: &EmitContext, text: &str) -> EmitResult {
        Self::line(writer, context, LineStyle::Comment, &format!("// {}", text))
    }

    /// Writes `header {`, the body one level deeper, then `}`.
    pub fn block<W: Write, F>(
        writer: &mut W,
        context: &mut EmitContext,
        header: &str,
        body: F,
    ) -> EmitResult
    where
        F: FnOnce(&mut W, &mut EmitContext) -> EmitResult,
    {
        Self::plain(writer, context, &format!("{} {{", header))?;
        context.indent();
        let result = body(writer, context);
        context.dedent();
        result?;
        Self::plain(writer, context, "}")
    }
}
