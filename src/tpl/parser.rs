use crate::error::{FrameKind, OpenFrame, TemplateError};
use crate::fs::FileSystem;
use crate::tpl::ast::{Branch, Guard, Node};
use crate::tpl::scanner::{Scanner, Text};
use std::mem;
use std::path::{Path, PathBuf};
use tracing::trace;

enum Block {
    Conditional { branches: Vec<Branch>, guard: Guard },
    Loop { variable: String, source: String },
}

/// An open block and the body currently being filled for it.
struct Frame {
    block: Block,
    body: Vec<Node>,
    line: usize,
}

impl Frame {
    fn kind(&self) -> FrameKind {
        match self.block {
            Block::Conditional { .. } => FrameKind::Conditional,
            Block::Loop { .. } => FrameKind::Loop,
        }
    }
}

fn open_kind(frame: Option<&Frame>) -> OpenFrame {
    OpenFrame(frame.map(Frame::kind))
}

pub(crate) struct Parser<'a> {
    scanner: Scanner<'a>,
    origin: Option<&'a Path>,
    fs: &'a dyn FileSystem,
    root: Vec<Node>,
    frames: Vec<Frame>,
}

/// Compile `source` into a root `Sequence`.
///
/// `origin` is the template's own path; relative includes are resolved against its directory.
pub(crate) fn parse_template(
    source: &str,
    origin: Option<&Path>,
    fs: &dyn FileSystem,
) -> Result<Node, TemplateError> {
    Parser {
        scanner: Scanner::new(source),
        origin,
        fs,
        root: Vec::new(),
        frames: Vec::new(),
    }
    .run()
}

impl<'a> Parser<'a> {
    fn run(mut self) -> Result<Node, TemplateError> {
        loop {
            match self.scanner.read_text() {
                Text::Directive(text) => self.append_text(text),
                Text::End(text) => {
                    self.append_text(text);
                    break;
                }
            }

            let line = self.scanner.line();
            let command = self.scanner.read_command();
            if command.is_empty() {
                break;
            }
            trace!("directive: command={}, line={}", command, line);

            self.scanner.skip_whitespace();
            self.dispatch(command, line)?;

            self.scanner.skip_whitespace();
            if !self.scanner.eat_close() {
                return Err(TemplateError::MissingCloseMarker {
                    command: command.to_string(),
                    line: self.scanner.line(),
                });
            }
            if command != "echo" {
                self.scanner.eat_line_break();
            }
        }

        if let Some(frame) = self.frames.last() {
            return Err(TemplateError::UnclosedBlock {
                open: frame.kind(),
                line: frame.line,
            });
        }
        Ok(Node::Sequence(self.root))
    }

    /// `line` is where the directive's open marker sits.
    fn dispatch(&mut self, command: &str, line: usize) -> Result<(), TemplateError> {
        match command {
            "echo" => {
                let query = self.query(command, line)?;
                self.append_node(Node::Interpolation(query));
            }
            "for" => {
                let variable = self.scanner.read_word();
                if variable.is_empty() {
                    return Err(TemplateError::MissingLoopVariable { line });
                }
                self.scanner.skip_whitespace();
                let source = self.query(command, line)?;
                self.frames.push(Frame {
                    block: Block::Loop {
                        variable: variable.to_string(),
                        source,
                    },
                    body: Vec::new(),
                    line,
                });
            }
            "if" | "ifexist" => {
                let query = self.query(command, line)?;
                let guard = if command == "if" {
                    Guard::Truthy(query)
                } else {
                    Guard::Exists(query)
                };
                self.frames.push(Frame {
                    block: Block::Conditional {
                        branches: Vec::new(),
                        guard,
                    },
                    body: Vec::new(),
                    line,
                });
            }
            "else" => {
                self.open_branch(Guard::Always)
                    .map_err(|open| TemplateError::UnexpectedElse { open, line })?;
            }
            "elsif" | "elif" => {
                let query = self.query(command, line)?;
                self.open_branch(Guard::Truthy(query))
                    .map_err(|open| TemplateError::UnexpectedElsif { open, line })?;
            }
            "endfor" => match self.frames.pop() {
                Some(Frame {
                    block: Block::Loop { variable, source },
                    body,
                    ..
                }) => self.append_node(Node::Loop {
                    variable,
                    source,
                    body: Box::new(Node::Sequence(body)),
                }),
                other => {
                    return Err(TemplateError::UnmatchedEndfor {
                        open: open_kind(other.as_ref()),
                        line,
                    });
                }
            },
            "endif" => match self.frames.pop() {
                Some(Frame {
                    block: Block::Conditional {
                        mut branches,
                        guard,
                    },
                    body,
                    ..
                }) => {
                    branches.push(Branch {
                        guard,
                        body: Node::Sequence(body),
                    });
                    self.append_node(Node::Conditional(branches));
                }
                other => {
                    return Err(TemplateError::UnmatchedEndif {
                        open: open_kind(other.as_ref()),
                        line,
                    });
                }
            },
            "include" => {
                self.scanner.skip_whitespace();
                let name = self.scanner.read_quoted();
                if name.is_empty() {
                    return Err(TemplateError::MissingFilename { line });
                }
                let path = self.resolve_include(Path::new(name));
                self.append_node(Node::Include(path));
            }
            other => {
                return Err(TemplateError::UnknownCommand {
                    command: other.to_string(),
                    line,
                });
            }
        }
        Ok(())
    }

    fn query(&mut self, command: &str, line: usize) -> Result<String, TemplateError> {
        let query = self.scanner.read_query();
        if query.is_empty() {
            return Err(TemplateError::MissingQuery {
                command: command.to_string(),
                line,
            });
        }
        Ok(query.to_string())
    }

    /// Close the current branch of the innermost conditional and start a new one.
    fn open_branch(&mut self, guard: Guard) -> Result<(), OpenFrame> {
        match self.frames.last_mut() {
            Some(Frame {
                block:
                    Block::Conditional {
                        branches,
                        guard: current,
                    },
                body,
                ..
            }) => {
                branches.push(Branch {
                    guard: mem::replace(current, guard),
                    body: Node::Sequence(mem::take(body)),
                });
                Ok(())
            }
            other => Err(open_kind(other.map(|f| &*f))),
        }
    }

    fn resolve_include(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            if let Some(parent) = self.origin.and_then(Path::parent) {
                let candidate = parent.join(path);
                if self.fs.exists(&candidate) {
                    trace!("include resolved: {} -> {}", path.display(), candidate.display());
                    return candidate;
                }
            }
        }
        path.to_path_buf()
    }

    fn container(&mut self) -> &mut Vec<Node> {
        match self.frames.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    fn append_node(&mut self, node: Node) {
        self.container().push(node);
    }

    fn append_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.append_node(Node::Text(text.to_string()));
        }
    }
}
