use std::collections::BTreeMap;
use std::fmt::Display;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::builtins;
use crate::config::Config;
use crate::value::expr::BinaryOpTy;
use crate::value::functions::{FunctionDefinition, FunctionRegistry};
use crate::value::scope::Scope;
use crate::value::{self, Value};

use self::lines::SourceLine;
use self::statement::{AssignTarget, Statement};

pub mod block;
pub mod eval;
pub mod lines;
pub mod print;
pub mod splitter;
pub mod statement;
mod util;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InterpreterError {
    #[error("{what} (line {line})")]
    Syntax { what: String, line: usize },
    #[error("{what} (line {line})")]
    Runtime { what: String, line: usize },
}

impl InterpreterError {
    fn syntax(what: impl Into<String>, line: &SourceLine) -> InterpreterError {
        InterpreterError::Syntax {
            what: what.into(),
            line: line.lineno,
        }
    }

    fn runtime(what: impl Display, line: &SourceLine) -> InterpreterError {
        InterpreterError::Runtime {
            what: what.to_string(),
            line: line.lineno,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            InterpreterError::Syntax { line, .. } | InterpreterError::Runtime { line, .. } => *line,
        }
    }

    pub fn what(&self) -> &str {
        match self {
            InterpreterError::Syntax { what, .. } | InterpreterError::Runtime { what, .. } => what,
        }
    }
}

/// How a run of lines finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Completion {
    Normal,
    Break,
    Continue,
    Return,
}

enum Step {
    Goto(usize),
    Exit(Completion),
}

/// Per indentation level, whether the open if/elif/else chain has already
/// run a branch.
#[derive(Default)]
struct BranchChains {
    taken: BTreeMap<usize, bool>,
}

impl BranchChains {
    fn reset_from(&mut self, indent: usize) {
        self.taken.retain(|&open, _| open < indent);
    }

    fn start(&mut self, indent: usize, taken: bool) {
        self.taken.insert(indent, taken);
    }

    fn get(&self, indent: usize) -> Option<bool> {
        self.taken.get(&indent).copied()
    }

    fn close(&mut self, indent: usize) {
        self.taken.remove(&indent);
    }
}

pub struct Interpreter {
    pub output: Vec<String>,
    globals: Scope,
    frames: Vec<Scope>,
    functions: FunctionRegistry,
    config: Config,
    loop_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new(Config::default())
    }
}

impl Interpreter {
    pub fn new(config: Config) -> Interpreter {
        Interpreter {
            output: Vec::new(),
            globals: Scope::new(),
            frames: Vec::new(),
            functions: FunctionRegistry::default(),
            config,
            loop_depth: 0,
        }
    }

    pub fn globals(&self) -> &Scope {
        &self.globals
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn interpret(&mut self, source: &str) -> Result<(), InterpreterError> {
        let lines = lines::scan_lines(source);
        debug!(lines = lines.len(), "interpreting program");
        self.exec_lines(&lines)?;
        Ok(())
    }

    fn scope(&self) -> &Scope {
        self.frames.last().unwrap_or(&self.globals)
    }

    fn scope_mut(&mut self) -> &mut Scope {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.globals,
        }
    }

    fn exec_lines(&mut self, lines: &[SourceLine]) -> Result<Completion, InterpreterError> {
        let mut chains = BranchChains::default();
        let mut cursor = 0;
        while cursor < lines.len() {
            match self.exec_line(lines, cursor, &mut chains)? {
                Step::Goto(next) => cursor = next,
                Step::Exit(completion) => return Ok(completion),
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_line(
        &mut self,
        lines: &[SourceLine],
        cursor: usize,
        chains: &mut BranchChains,
    ) -> Result<Step, InterpreterError> {
        let line = &lines[cursor];
        if line.is_blank() {
            return Ok(Step::Goto(cursor + 1));
        }

        let statement =
            statement::classify(&line.text).map_err(|what| InterpreterError::syntax(what, line))?;
        trace!(line = line.lineno, ?statement, "dispatch");

        match &statement {
            Statement::Elif(_) | Statement::Else => chains.reset_from(line.indent + 1),
            _ => chains.reset_from(line.indent),
        }

        let next = cursor + 1;
        match statement {
            Statement::Print(arguments) => {
                let rendered = print::render(arguments, self.scope());
                self.output.push(rendered);
                Ok(Step::Goto(next))
            }
            Statement::FunctionDef { name, params } => {
                let end = body_end(lines, cursor, "def")?;
                self.define_function(name, &params, &lines[next..=end]);
                Ok(Step::Goto(end + 1))
            }
            Statement::Assign { target, op, value } => {
                self.assign(target, op, value, line)?;
                Ok(Step::Goto(next))
            }
            Statement::If(condition) => {
                let end = body_end(lines, cursor, "if")?;
                let taken = self.condition(condition, line)?;
                chains.start(line.indent, taken);
                Ok(Step::Goto(if taken { next } else { end + 1 }))
            }
            Statement::Elif(condition) => {
                let end = body_end(lines, cursor, "elif")?;
                match chains.get(line.indent) {
                    None => Err(InterpreterError::syntax(
                        "'elif' without a matching 'if'",
                        line,
                    )),
                    Some(true) => Ok(Step::Goto(end + 1)),
                    Some(false) => {
                        let taken = self.condition(condition, line)?;
                        chains.start(line.indent, taken);
                        Ok(Step::Goto(if taken { next } else { end + 1 }))
                    }
                }
            }
            Statement::Else => {
                let end = body_end(lines, cursor, "else")?;
                let taken = chains.get(line.indent);
                chains.close(line.indent);
                match taken {
                    None => Err(InterpreterError::syntax(
                        "'else' without a matching 'if'",
                        line,
                    )),
                    Some(true) => Ok(Step::Goto(end + 1)),
                    Some(false) => Ok(Step::Goto(next)),
                }
            }
            Statement::For { variable, iterable } => {
                let end = body_end(lines, cursor, "for")?;
                match self.exec_for(variable, iterable, &lines[next..=end], line)? {
                    Completion::Return => Ok(Step::Exit(Completion::Return)),
                    _ => Ok(Step::Goto(end + 1)),
                }
            }
            Statement::While(condition) => {
                let end = body_end(lines, cursor, "while")?;
                match self.exec_while(condition, &lines[next..=end], line)? {
                    Completion::Return => Ok(Step::Exit(Completion::Return)),
                    _ => Ok(Step::Goto(end + 1)),
                }
            }
            Statement::Call { name, args } => {
                self.call_function(name, args, line)?;
                Ok(Step::Goto(next))
            }
            Statement::Append { list, value } => {
                self.append(list, value, line)?;
                Ok(Step::Goto(next))
            }
            Statement::Return(value) => {
                if self.frames.is_empty() {
                    return Err(InterpreterError::syntax("'return' outside function", line));
                }
                if let Some(value) = value {
                    debug!(line = line.lineno, value, "return value is not propagated");
                }
                Ok(Step::Exit(Completion::Return))
            }
            Statement::Break => {
                if self.loop_depth == 0 {
                    return Err(InterpreterError::syntax("'break' outside loop", line));
                }
                Ok(Step::Exit(Completion::Break))
            }
            Statement::Continue => {
                if self.loop_depth == 0 {
                    return Err(InterpreterError::syntax(
                        "'continue' not properly in loop",
                        line,
                    ));
                }
                Ok(Step::Exit(Completion::Continue))
            }
            Statement::Pass => Ok(Step::Goto(next)),
            Statement::Unrecognized => {
                debug!(line = line.lineno, text = %line.text, "ignoring unrecognized line");
                Ok(Step::Goto(next))
            }
        }
    }

    fn condition(&self, condition: &str, line: &SourceLine) -> Result<bool, InterpreterError> {
        eval::evaluate_condition(condition, self.scope())
            .map_err(|err| InterpreterError::runtime(err, line))
    }

    fn assign(
        &mut self,
        target: AssignTarget,
        op: Option<BinaryOpTy>,
        rhs: &str,
        line: &SourceLine,
    ) -> Result<(), InterpreterError> {
        let new_val = match op {
            None => eval::evaluate(rhs, self.scope()).into_value(),
            Some(op) => {
                let current = match target {
                    AssignTarget::Name(name) => eval::evaluate_strict(name, self.scope()),
                    AssignTarget::Subscript { name, index } => {
                        eval::evaluate_strict(&format!("{}[{}]", name, index), self.scope())
                    }
                };
                current
                    .and_then(|current| {
                        let rhs = eval::evaluate_strict(rhs, self.scope())?;
                        eval::binary(op, &current, &rhs)
                    })
                    .map_err(|err| InterpreterError::runtime(err, line))?
            }
        };

        match target {
            AssignTarget::Name(name) => {
                self.scope_mut().define(name, new_val);
                Ok(())
            }
            AssignTarget::Subscript { name, index } => {
                let index = eval::evaluate_strict(index, self.scope())
                    .map_err(|err| InterpreterError::runtime(err, line))?;
                match self.scope_mut().get_mut(name) {
                    Some(Value::List(elements)) => {
                        let position = match index {
                            Value::Number(n) => value::subscript_to_inbound_index(elements.len(), n)
                                .map_err(|err| {
                                    InterpreterError::runtime(
                                        err.replace("index", "assignment index"),
                                        line,
                                    )
                                })?,
                            other => {
                                return Err(InterpreterError::runtime(
                                    format!(
                                        "list indices must be integers, not '{}'",
                                        value::type_of(&other)
                                    ),
                                    line,
                                ))
                            }
                        };
                        elements[position] = new_val;
                        Ok(())
                    }
                    Some(other) => Err(InterpreterError::runtime(
                        format!(
                            "'{}' object does not support item assignment",
                            value::type_of(other)
                        ),
                        line,
                    )),
                    None => Err(InterpreterError::runtime(
                        format!("name '{}' is not defined", name),
                        line,
                    )),
                }
            }
        }
    }

    fn append(&mut self, list: &str, element: &str, line: &SourceLine) -> Result<(), InterpreterError> {
        let element = eval::evaluate(element, self.scope()).into_value();
        match self.scope_mut().get_mut(list) {
            Some(Value::List(elements)) => {
                elements.push(element);
                Ok(())
            }
            Some(other) => Err(InterpreterError::runtime(
                format!(
                    "'{}' object has no attribute 'append'",
                    value::type_of(other)
                ),
                line,
            )),
            None => Err(InterpreterError::runtime(
                format!("name '{}' is not defined", list),
                line,
            )),
        }
    }

    fn exec_for(
        &mut self,
        variable: &str,
        iterable: &str,
        body: &[SourceLine],
        line: &SourceLine,
    ) -> Result<Completion, InterpreterError> {
        let elements = match eval::evaluate(iterable, self.scope()) {
            eval::Evaluation::Value(Value::List(elements)) => elements,
            eval::Evaluation::Value(Value::Str(s)) => {
                s.chars().map(|c| Value::Str(c.to_string())).collect()
            }
            eval::Evaluation::Value(other) => {
                return Err(InterpreterError::runtime(
                    format!("'{}' object is not iterable", value::type_of(&other)),
                    line,
                ))
            }
            eval::Evaluation::Fallback(text) => {
                return Err(InterpreterError::runtime(
                    format!("'{}' is not iterable", text),
                    line,
                ))
            }
        };

        self.loop_depth += 1;
        let result = self.run_for_body(variable, elements, body);
        self.loop_depth -= 1;
        result
    }

    fn run_for_body(
        &mut self,
        variable: &str,
        elements: Vec<Value>,
        body: &[SourceLine],
    ) -> Result<Completion, InterpreterError> {
        for element in elements {
            self.scope_mut().define(variable, element);
            match self.exec_lines(body)? {
                Completion::Break => break,
                Completion::Return => return Ok(Completion::Return),
                Completion::Normal | Completion::Continue => {}
            }
        }
        Ok(Completion::Normal)
    }

    fn exec_while(
        &mut self,
        condition: &str,
        body: &[SourceLine],
        line: &SourceLine,
    ) -> Result<Completion, InterpreterError> {
        self.loop_depth += 1;
        let result = self.run_while_body(condition, body, line);
        self.loop_depth -= 1;
        result
    }

    fn run_while_body(
        &mut self,
        condition: &str,
        body: &[SourceLine],
        line: &SourceLine,
    ) -> Result<Completion, InterpreterError> {
        let mut iterations = 0;
        while self.condition(condition, line)? {
            if iterations == self.config.while_iteration_cap {
                warn!(
                    line = line.lineno,
                    cap = self.config.while_iteration_cap,
                    "while loop stopped at the iteration cap"
                );
                self.output.push(self.config.loop_cap_warning());
                break;
            }
            iterations += 1;
            match self.exec_lines(body)? {
                Completion::Break => break,
                Completion::Return => return Ok(Completion::Return),
                Completion::Normal | Completion::Continue => {}
            }
        }
        Ok(Completion::Normal)
    }

    fn define_function(&mut self, name: &str, params: &[&str], body: &[SourceLine]) {
        self.scope_mut()
            .define(name, Value::Function(name.to_string()));
        let definition = FunctionDefinition {
            name: name.to_string(),
            params: params.iter().map(|param| param.to_string()).collect(),
            body: body.to_vec(),
            captured: self.scope().clone(),
        };
        debug!(
            name,
            params = definition.params.len(),
            body = definition.body.len(),
            "defined function"
        );
        self.functions.define(definition);
    }

    fn call_function(&mut self, name: &str, args: &str, line: &SourceLine) -> Result<(), InterpreterError> {
        let args: Vec<Value> = splitter::split_arguments(args)
            .into_iter()
            .map(|arg| eval::evaluate(arg, self.scope()).into_value())
            .collect();

        let definition = match self.functions.get(name) {
            Some(definition) => definition,
            None => {
                return match builtins::lookup(name) {
                    Some(builtin) => builtins::call(builtin, &args)
                        .map(|_| ())
                        .map_err(|err| InterpreterError::runtime(err, line)),
                    None => Err(InterpreterError::runtime(
                        format!("name '{}' is not defined", name),
                        line,
                    )),
                }
            }
        };

        if args.len() > definition.params.len() {
            return Err(InterpreterError::runtime(
                format!(
                    "{}() takes {} positional argument(s) but {} were given",
                    name,
                    definition.params.len(),
                    args.len()
                ),
                line,
            ));
        }
        if self.frames.len() >= self.config.max_call_depth {
            return Err(InterpreterError::runtime(
                "maximum recursion depth exceeded",
                line,
            ));
        }

        let mut frame = definition.captured.clone();
        let mut args = args.into_iter();
        for param in &definition.params {
            frame.define(param.as_str(), args.next().unwrap_or(Value::Nil));
        }

        trace!(name, depth = self.frames.len() + 1, "calling function");
        self.frames.push(frame);
        let outer_loop_depth = std::mem::take(&mut self.loop_depth);
        let result = self.exec_lines(&definition.body);
        self.loop_depth = outer_loop_depth;
        self.frames.pop();
        result.map(|_| ())
    }
}

/// End of the block opened at `header`, which must not be empty.
fn body_end(lines: &[SourceLine], header: usize, construct: &str) -> Result<usize, InterpreterError> {
    let end = block::block_end(lines, header);
    if end == header {
        return Err(InterpreterError::syntax(
            format!("expected an indented block after '{}' statement", construct),
            &lines[header],
        ));
    }
    Ok(end)
}
