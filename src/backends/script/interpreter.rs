// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tree-walking evaluator for UI scripts.
//!
//! The interpreter only touches the host through the [`FrameContext`] it is
//! given: node constructors go to the tree builder and `state`/`set` go to the
//! persistent store. Without a frame (while running `init`) those builtins
//! fail, so `init` can only compute plain values.

use super::ast::{BinaryOp, Expr, ExprKind, Stmt, StmtKind, UnaryOp};
use super::parser::MAX_NESTING;
use super::value::Value;
use crate::errors::RenderError;
use crate::observability::messages::frame::ScriptLog;
use crate::observability::messages::StructuredLog;
use crate::traits::FrameContext;
use crate::tree::{Align, Attrs, Color, Easing, NodeHandle, NodeKind, Styled};
use std::collections::HashMap;

pub(crate) type Globals = HashMap<String, Value>;

/// Blocks plus expression levels a running script may be inside at once.
/// Parsed programs stay well below it.
const MAX_DEPTH: usize = 2 * MAX_NESTING;

pub(crate) struct Interpreter<'f, 'a> {
    frame: Option<&'f mut FrameContext<'a>>,
    globals: Globals,
    locals: Vec<HashMap<String, Value>>,
    steps: u64,
    max_steps: u64,
    depth: usize,
}

fn script_error(line: usize, message: impl Into<String>) -> RenderError {
    RenderError::Script {
        line,
        message: message.into(),
    }
}

impl<'f, 'a> Interpreter<'f, 'a> {
    pub fn for_frame(frame: &'f mut FrameContext<'a>, globals: Globals, max_steps: u64) -> Self {
        Self {
            frame: Some(frame),
            globals,
            locals: Vec::new(),
            steps: 0,
            max_steps,
            depth: 0,
        }
    }

    pub fn for_init(max_steps: u64) -> Self {
        Self {
            frame: None,
            globals: Globals::new(),
            locals: Vec::new(),
            steps: 0,
            max_steps,
            depth: 0,
        }
    }

    pub fn into_globals(self) -> Globals {
        self.globals
    }

    /// Executes `stmts` in the current scope.
    pub fn run(&mut self, stmts: &[Stmt]) -> Result<(), RenderError> {
        for stmt in stmts {
            self.exec(stmt)?;
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<(), RenderError> {
        self.steps += 1;
        if self.steps > self.max_steps {
            return Err(RenderError::StepLimit {
                limit: self.max_steps,
            });
        }
        Ok(())
    }

    fn descend(&mut self, line: usize) -> Result<(), RenderError> {
        if self.depth >= MAX_DEPTH {
            return Err(script_error(
                line,
                format!("nesting exceeds {} levels", MAX_DEPTH),
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn block(&mut self, stmts: &[Stmt], scope: HashMap<String, Value>) -> Result<(), RenderError> {
        self.descend(stmts.first().map_or(0, |stmt| stmt.line))?;
        self.locals.push(scope);
        let result = self.run(stmts);
        self.locals.pop();
        self.depth -= 1;
        result
    }

    fn declare(&mut self, name: &str, value: Value) {
        match self.locals.last_mut() {
            Some(scope) => scope.insert(name.to_string(), value),
            None => self.globals.insert(name.to_string(), value),
        };
    }

    fn lookup(&self, name: &str) -> Option<&Value> {
        self.locals
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.globals.get(name))
    }

    fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), RenderError> {
        let slot = self
            .locals
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .or_else(|| self.globals.get_mut(name))
            .ok_or_else(|| {
                script_error(line, format!("assignment to undeclared variable '{}'", name))
            })?;
        *slot = value;
        Ok(())
    }

    fn exec(&mut self, stmt: &Stmt) -> Result<(), RenderError> {
        self.tick()?;
        match &stmt.kind {
            StmtKind::Let(name, expr) => {
                let value = self.eval(expr)?;
                self.declare(name, value);
            }
            StmtKind::Assign(name, expr) => {
                let value = self.eval(expr)?;
                self.assign(name, value, stmt.line)?;
            }
            StmtKind::If {
                cond,
                then,
                otherwise,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.block(then, HashMap::new())?;
                } else {
                    self.block(otherwise, HashMap::new())?;
                }
            }
            StmtKind::For {
                var,
                start,
                end,
                body,
            } => {
                let start = self.eval_number(start, "loop start")?;
                let end = self.eval_number(end, "loop end")?;
                let mut i = start;
                while i < end {
                    self.tick()?;
                    let scope = HashMap::from([(var.clone(), Value::Number(i))]);
                    self.block(body, scope)?;
                    i += 1.0;
                }
            }
            StmtKind::Expr(expr) => {
                self.eval(expr)?;
            }
        }
        Ok(())
    }

    fn eval_number(&mut self, expr: &Expr, what: &str) -> Result<f64, RenderError> {
        match self.eval(expr)? {
            Value::Number(n) => Ok(n),
            other => Err(script_error(
                expr.line,
                format!("{} must be a number, got {}", what, other.type_name()),
            )),
        }
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, RenderError> {
        self.descend(expr.line)?;
        let result = self.eval_kind(expr);
        self.depth -= 1;
        result
    }

    fn eval_kind(&mut self, expr: &Expr) -> Result<Value, RenderError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Var(name) => self
                .lookup(name)
                .cloned()
                .ok_or_else(|| script_error(expr.line, format!("unknown variable '{}'", name))),
            ExprKind::Unary(op, operand) => {
                let value = self.eval(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(-n)),
                    (UnaryOp::Neg, other) => Err(script_error(
                        expr.line,
                        format!("cannot negate a {}", other.type_name()),
                    )),
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                }
            }
            ExprKind::Binary(BinaryOp::And, left, right) => {
                if !self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            ExprKind::Binary(BinaryOp::Or, left, right) => {
                if self.eval(left)?.is_truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.eval(right)?.is_truthy()))
            }
            ExprKind::Binary(op, left, right) => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, left, right, expr.line)
            }
            ExprKind::Call { name, args } => {
                let values = self.eval_all(args)?;
                self.call(Args::new(name, values, expr.line))
            }
            ExprKind::Method {
                receiver,
                name,
                args,
            } => {
                let receiver = self.eval(receiver)?;
                let values = self.eval_all(args)?;
                self.method(receiver, Args::new(name, values, expr.line))
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RenderError> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    fn frame(&mut self, args: &Args<'_>) -> Result<&mut FrameContext<'a>, RenderError> {
        match self.frame.as_deref_mut() {
            Some(frame) => Ok(frame),
            None => Err(args.error(format!("'{}' is not available in init", args.name))),
        }
    }

    fn container(&mut self, kind: NodeKind, args: &Args<'_>) -> Result<Value, RenderError> {
        args.exactly(0)?;
        let id = self.frame(args)?.ui.begin_container(kind, Attrs::new())?.id();
        Ok(Value::Node(id))
    }

    fn leaf(&mut self, kind: NodeKind, attrs: Attrs, args: &Args<'_>) -> Result<Value, RenderError> {
        let id = self.frame(args)?.ui.leaf(kind, attrs)?.id();
        Ok(Value::Node(id))
    }

    fn call(&mut self, args: Args<'_>) -> Result<Value, RenderError> {
        match args.name {
            "width" | "height" | "frame" => {
                args.exactly(0)?;
                let frame = self.frame(&args)?;
                let value = match args.name {
                    "width" => f64::from(frame.width()),
                    "height" => f64::from(frame.height()),
                    _ => frame.frame as f64,
                };
                Ok(Value::Number(value))
            }
            "state" => {
                args.exactly(2)?;
                let key = args.string(0)?;
                let default = args.value(1)?.clone();
                let state = &mut self.frame(&args)?.state;
                match default {
                    Value::Number(n) => Ok(Value::Number(state.get_or_default(key, n)?)),
                    Value::Bool(b) => Ok(Value::Bool(state.get_or_default(key, b)?)),
                    Value::Str(s) => Ok(Value::Str(state.get_or_default(key, s)?)),
                    Value::Color(c) => Ok(Value::Color(state.get_or_default(key, c)?)),
                    other => Err(args.error(format!(
                        "a {} cannot be kept in state",
                        other.type_name()
                    ))),
                }
            }
            "set" => {
                args.exactly(2)?;
                let key = args.string(0)?.to_string();
                let value = args.value(1)?.clone();
                let state = &mut self.frame(&args)?.state;
                match value {
                    Value::Number(n) => state.set(key, n),
                    Value::Bool(b) => state.set(key, b),
                    Value::Str(s) => state.set(key, s),
                    Value::Color(c) => state.set(key, c),
                    other => {
                        return Err(args.error(format!(
                            "a {} cannot be kept in state",
                            other.type_name()
                        )))
                    }
                }
                Ok(Value::Nil)
            }
            "reset" => {
                args.exactly(1)?;
                let key = args.string(0)?;
                Ok(Value::Bool(self.frame(&args)?.state.remove(key)))
            }
            "rgb" => {
                args.exactly(3)?;
                Ok(Value::Color(Color::rgb(
                    args.f32(0)?,
                    args.f32(1)?,
                    args.f32(2)?,
                )))
            }
            "rgba" => {
                args.exactly(4)?;
                Ok(Value::Color(Color::rgba(
                    args.f32(0)?,
                    args.f32(1)?,
                    args.f32(2)?,
                    args.f32(3)?,
                )))
            }
            "hex" => {
                args.exactly(1)?;
                let text = args.string(0)?;
                Color::parse_hex(text)
                    .map(Value::Color)
                    .ok_or_else(|| args.error(format!("invalid hex color '{}'", text)))
            }
            "str" => {
                args.exactly(1)?;
                Ok(Value::Str(args.value(0)?.to_string()))
            }
            "min" | "max" => {
                args.exactly(2)?;
                let (a, b) = (args.number(0)?, args.number(1)?);
                Ok(Value::Number(if args.name == "min" {
                    a.min(b)
                } else {
                    a.max(b)
                }))
            }
            "floor" => {
                args.exactly(1)?;
                Ok(Value::Number(args.number(0)?.floor()))
            }
            "abs" => {
                args.exactly(1)?;
                Ok(Value::Number(args.number(0)?.abs()))
            }
            "log" => {
                let message = args
                    .values
                    .iter()
                    .map(Value::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                ScriptLog {
                    line: args.line,
                    message: &message,
                }
                .log();
                Ok(Value::Nil)
            }
            "fail" => {
                args.exactly(1)?;
                Err(args.error(args.value(0)?.to_string()))
            }
            "column" => self.container(NodeKind::Column, &args),
            "row" => self.container(NodeKind::Row, &args),
            "scroll" => self.container(NodeKind::Scroll, &args),
            "end" => {
                args.exactly(0)?;
                self.frame(&args)?.ui.end()?;
                Ok(Value::Nil)
            }
            "text" => {
                args.exactly(1)?;
                let text = args.value(0)?.to_string();
                self.leaf(NodeKind::Text, Attrs::new().text(text), &args)
            }
            "box" => {
                args.exactly(0)?;
                self.leaf(NodeKind::Box, Attrs::new(), &args)
            }
            "button" => {
                args.exactly(1)?;
                let label = args.value(0)?.to_string();
                self.leaf(NodeKind::Button, Attrs::new().text(label), &args)
            }
            "image" => {
                args.exactly(1)?;
                let source = args.string(0)?.to_string();
                self.leaf(NodeKind::Image, Attrs::new().text(source), &args)
            }
            "path" => {
                if args.values.len() < 4 || args.values.len() % 2 != 0 {
                    return Err(args.error("path takes at least two x, y pairs"));
                }
                let mut points = Vec::with_capacity(args.values.len() / 2);
                for i in (0..args.values.len()).step_by(2) {
                    points.push((args.f32(i)?, args.f32(i + 1)?));
                }
                self.leaf(NodeKind::Path, Attrs::new().points(points), &args)
            }
            "slider" => {
                args.exactly(3)?;
                let attrs = Attrs::new()
                    .value(args.f32(0)?)
                    .range(args.f32(1)?, args.f32(2)?);
                self.leaf(NodeKind::Slider, attrs, &args)
            }
            "toggle" => {
                args.exactly(1)?;
                let on = if args.value(0)?.is_truthy() { 1.0 } else { 0.0 };
                self.leaf(NodeKind::Toggle, Attrs::new().value(on), &args)
            }
            "text_input" => {
                args.exactly(1)?;
                let text = args.value(0)?.to_string();
                self.leaf(NodeKind::TextInput, Attrs::new().text(text), &args)
            }
            "color_picker" => {
                args.exactly(1)?;
                let color = args.color(0)?;
                self.leaf(NodeKind::ColorPicker, Attrs::new().color(color), &args)
            }
            name => Err(args.error(format!("unknown function '{}'", name))),
        }
    }

    fn method(&mut self, receiver: Value, args: Args<'_>) -> Result<Value, RenderError> {
        let Value::Node(id) = receiver else {
            return Err(args.error(format!(
                "cannot call '{}' on a {}",
                args.name,
                receiver.type_name()
            )));
        };
        let handle = self.frame(&args)?.ui.configure(id)?;
        style(handle, &args)?;
        Ok(Value::Node(id))
    }
}

fn style(handle: NodeHandle<'_>, args: &Args<'_>) -> Result<(), RenderError> {
    match args.name {
        "size" => {
            args.exactly(2)?;
            handle.size(args.f32(0)?, args.f32(1)?);
        }
        "bg" | "color" => {
            args.exactly(1)?;
            let color = args.color(0)?;
            if args.name == "bg" {
                handle.bg(color);
            } else {
                handle.color(color);
            }
        }
        "align" => {
            args.exactly(1)?;
            let name = args.string(0)?;
            let align = Align::from_name(name)
                .ok_or_else(|| args.error(format!("unknown alignment '{}'", name)))?;
            handle.align(align);
        }
        "clip" => {
            args.exactly(1)?;
            handle.clip(args.value(0)?.is_truthy());
        }
        "transition" => {
            if args.values.is_empty() || args.values.len() > 2 {
                return Err(args.error("transition takes a duration and an optional easing"));
            }
            let duration_ms = args.number(0)?.max(0.0) as u32;
            let easing = match args.values.len() {
                2 => {
                    let name = args.string(1)?;
                    Easing::from_name(name)
                        .ok_or_else(|| args.error(format!("unknown easing '{}'", name)))?
                }
                _ => Easing::EaseOut,
            };
            handle.transition(duration_ms, easing);
        }
        "width" | "height" | "padding" | "margin" | "radius" | "shadow" | "grow"
        | "font_size" | "value" => {
            args.exactly(1)?;
            let value = args.f32(0)?;
            match args.name {
                "width" => handle.width(value),
                "height" => handle.height(value),
                "padding" => handle.padding(value),
                "margin" => handle.margin(value),
                "radius" => handle.radius(value),
                "shadow" => handle.shadow(value),
                "grow" => handle.grow(value),
                "font_size" => handle.font_size(value),
                _ => handle.value(value),
            };
        }
        name => return Err(args.error(format!("unknown method '{}'", name))),
    }
    Ok(())
}

fn binary(op: BinaryOp, left: Value, right: Value, line: usize) -> Result<Value, RenderError> {
    use Value::{Bool, Number, Str};
    let value = match (op, left, right) {
        (BinaryOp::Eq, l, r) => Bool(l == r),
        (BinaryOp::NotEq, l, r) => Bool(l != r),
        (BinaryOp::Add, Number(a), Number(b)) => Number(a + b),
        (BinaryOp::Add, l @ Str(_), r) | (BinaryOp::Add, l, r @ Str(_)) => {
            Str(format!("{}{}", l, r))
        }
        (BinaryOp::Sub, Number(a), Number(b)) => Number(a - b),
        (BinaryOp::Mul, Number(a), Number(b)) => Number(a * b),
        (BinaryOp::Div | BinaryOp::Rem, Number(_), Number(b)) if b == 0.0 => {
            return Err(script_error(line, "division by zero"));
        }
        (BinaryOp::Div, Number(a), Number(b)) => Number(a / b),
        (BinaryOp::Rem, Number(a), Number(b)) => Number(a.rem_euclid(b)),
        (BinaryOp::Lt, Number(a), Number(b)) => Bool(a < b),
        (BinaryOp::LtEq, Number(a), Number(b)) => Bool(a <= b),
        (BinaryOp::Gt, Number(a), Number(b)) => Bool(a > b),
        (BinaryOp::GtEq, Number(a), Number(b)) => Bool(a >= b),
        (op, l, r) => {
            return Err(script_error(
                line,
                format!(
                    "unsupported operands for {:?}: {} and {}",
                    op,
                    l.type_name(),
                    r.type_name()
                ),
            ))
        }
    };
    Ok(value)
}

/// Evaluated arguments of one call, with typed accessors.
struct Args<'n> {
    name: &'n str,
    values: Vec<Value>,
    line: usize,
}

impl<'n> Args<'n> {
    fn new(name: &'n str, values: Vec<Value>, line: usize) -> Self {
        Self { name, values, line }
    }

    fn error(&self, message: impl Into<String>) -> RenderError {
        script_error(self.line, message)
    }

    fn exactly(&self, count: usize) -> Result<(), RenderError> {
        if self.values.len() != count {
            return Err(self.error(format!(
                "{}() takes {} argument(s), got {}",
                self.name,
                count,
                self.values.len()
            )));
        }
        Ok(())
    }

    fn value(&self, index: usize) -> Result<&Value, RenderError> {
        self.values
            .get(index)
            .ok_or_else(|| self.error(format!("{}() is missing argument {}", self.name, index + 1)))
    }

    fn mismatch(&self, index: usize, expected: &str, got: &Value) -> RenderError {
        self.error(format!(
            "argument {} of {}() must be a {}, got {}",
            index + 1,
            self.name,
            expected,
            got.type_name()
        ))
    }

    fn number(&self, index: usize) -> Result<f64, RenderError> {
        match self.value(index)? {
            Value::Number(n) => Ok(*n),
            other => Err(self.mismatch(index, "number", other)),
        }
    }

    fn f32(&self, index: usize) -> Result<f32, RenderError> {
        self.number(index).map(|n| n as f32)
    }

    fn string(&self, index: usize) -> Result<&str, RenderError> {
        match self.value(index)? {
            Value::Str(s) => Ok(s),
            other => Err(self.mismatch(index, "string", other)),
        }
    }

    fn color(&self, index: usize) -> Result<Color, RenderError> {
        match self.value(index)? {
            Value::Color(c) => Ok(*c),
            other => Err(self.mismatch(index, "color", other)),
        }
    }
}
