//! JSON 脚本
//!
//! 脚本是一串运行时操作，用 `let` 给结果命名：
//!
//! ```json
//! {
//!   "init": [{ "name": "globals", "steps": [{ "op": "set_new", "let": "seen", "element_type": "int" }] }],
//!   "steps": [
//!     { "op": "set_add", "set": "seen", "value": 1 },
//!     { "op": "length_of", "collection": "seen" }
//!   ]
//! }
//! ```
//!
//! 操作数可以是整数、字符串字面量，或 `{ "var": "name" }` 引用已有绑定。
//! 产生值的步骤没有 `let` 时直接打印结果。

use serde::Deserialize;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use wyrt_api::{write_line, InitChain};
use wyrt_core::{Runtime, RuntimeError, TypeTag, Value};

use crate::config::CLI_TARGET;

/// 脚本加载错误
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 脚本执行错误（不属于运行时的失败）
#[derive(Error, Debug)]
pub enum ScriptError {
    #[error("step {step}: unbound name '{name}'")]
    Unbound { step: usize, name: String },

    #[error("cannot write output: {0}")]
    Io(#[from] io::Error),
}

/// 操作数
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Int(i64),
    Text(String),
    Var { var: String },
}

/// 单个步骤
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    SetNew {
        #[serde(rename = "let")]
        bind: String,
        #[serde(default)]
        element_type: Option<TypeTag>,
    },
    MapNew {
        #[serde(rename = "let")]
        bind: String,
        #[serde(default)]
        key_type: Option<TypeTag>,
    },
    ListNew {
        #[serde(rename = "let")]
        bind: String,
        #[serde(default)]
        size_hint: Option<usize>,
    },
    Box {
        #[serde(rename = "let")]
        bind: String,
        value: Operand,
    },
    SetAdd {
        set: String,
        value: Operand,
    },
    MapAdd {
        map: String,
        key: Operand,
        value: Operand,
    },
    ListAppend {
        list: String,
        value: Operand,
    },
    ListGet {
        #[serde(rename = "let", default)]
        bind: Option<String>,
        list: String,
        index: usize,
    },
    IndexOf {
        #[serde(rename = "let", default)]
        bind: Option<String>,
        collection: String,
        key: Operand,
    },
    LengthOf {
        #[serde(rename = "let", default)]
        bind: Option<String>,
        collection: String,
    },
    Print {
        value: Operand,
    },
    Release {
        value: String,
        #[serde(default)]
        deep: bool,
    },
}

/// 具名的初始化步骤组
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitBlock {
    pub name: String,
    pub steps: Vec<Step>,
}

/// 完整脚本
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub init: Vec<InitBlock>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

enum StepError {
    Runtime(RuntimeError),
    Script(ScriptError),
}

impl From<RuntimeError> for StepError {
    fn from(e: RuntimeError) -> Self {
        StepError::Runtime(e)
    }
}

impl From<ScriptError> for StepError {
    fn from(e: ScriptError) -> Self {
        StepError::Script(e)
    }
}

impl From<io::Error> for StepError {
    fn from(e: io::Error) -> Self {
        StepError::Script(ScriptError::Io(e))
    }
}

/// 脚本解释器
///
/// 运行时错误原样返回（由调用方终止进程）；脚本自身的错误被记录下来，
/// 之后的步骤全部跳过。
pub struct Interpreter<W: Write> {
    bindings: HashMap<String, Value>,
    out: W,
    default_size_hint: usize,
    executed: usize,
    failure: Option<ScriptError>,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W, default_size_hint: usize) -> Self {
        Self {
            bindings: HashMap::new(),
            out,
            default_size_hint,
            executed: 0,
            failure: None,
        }
    }

    /// 依次执行步骤
    pub fn run_steps(&mut self, rt: &Runtime, steps: &[Step]) -> Result<(), RuntimeError> {
        for step in steps {
            if self.failure.is_some() {
                break;
            }
            self.executed += 1;
            match self.step(rt, step) {
                Ok(()) => {}
                Err(StepError::Runtime(e)) => return Err(e),
                Err(StepError::Script(e)) => self.failure = Some(e),
            }
        }
        Ok(())
    }

    /// 取出记录的脚本错误
    pub fn take_failure(&mut self) -> Option<ScriptError> {
        self.failure.take()
    }

    pub fn executed(&self) -> usize {
        self.executed
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    fn step(&mut self, rt: &Runtime, step: &Step) -> Result<(), StepError> {
        match step {
            Step::SetNew { bind, element_type } => {
                let set = rt.set_new(element_type.unwrap_or(TypeTag::None));
                self.bind(bind, set);
            }
            Step::MapNew { bind, key_type } => {
                let map = rt.map_new(key_type.unwrap_or(TypeTag::None));
                self.bind(bind, map);
            }
            Step::ListNew { bind, size_hint } => {
                let list = rt.list_new(size_hint.unwrap_or(self.default_size_hint))?;
                self.bind(bind, list);
            }
            Step::Box { bind, value } => {
                let value = self.operand(rt, value)?;
                self.bind(bind, value);
            }
            Step::SetAdd { set, value } => {
                let value = self.operand(rt, value)?;
                rt.set_add(self.lookup(set)?, &value)?;
            }
            Step::MapAdd { map, key, value } => {
                let key = self.operand(rt, key)?;
                let value = self.operand(rt, value)?;
                rt.map_add(self.lookup(map)?, &key, &value)?;
            }
            Step::ListAppend { list, value } => {
                let value = self.operand(rt, value)?;
                rt.list_append(self.lookup(list)?, &value)?;
            }
            Step::ListGet { bind, list, index } => {
                let got = rt.list_get(self.lookup(list)?, *index)?;
                match (bind, got) {
                    (Some(name), Some(value)) => self.bind(name, value),
                    (Some(name), None) => {
                        debug!(target: CLI_TARGET, "list_get past the end, '{}' left unbound", name);
                    }
                    (None, got) => self.emit(got.as_ref())?,
                }
            }
            Step::IndexOf {
                bind,
                collection,
                key,
            } => {
                let key = self.operand(rt, key)?;
                let value = rt.index_of(self.lookup(collection)?, &key)?;
                self.bind_or_emit(bind.as_deref(), value)?;
            }
            Step::LengthOf { bind, collection } => {
                let length = rt.length_of(self.lookup(collection)?)?;
                self.bind_or_emit(bind.as_deref(), length)?;
            }
            Step::Print { value } => {
                let value = self.operand(rt, value)?;
                self.emit(Some(&value))?;
            }
            Step::Release { value, deep } => {
                let handle = self.bindings.remove(value).ok_or_else(|| self.unbound(value))?;
                let remaining = rt.release(handle, *deep)?;
                debug!(target: CLI_TARGET, "released '{}', {} references left", value, remaining);
            }
        }
        Ok(())
    }

    fn unbound(&self, name: &str) -> ScriptError {
        ScriptError::Unbound {
            step: self.executed,
            name: name.to_string(),
        }
    }

    fn lookup(&self, name: &str) -> Result<&Value, ScriptError> {
        self.bindings.get(name).ok_or_else(|| self.unbound(name))
    }

    fn operand(&self, rt: &Runtime, operand: &Operand) -> Result<Value, ScriptError> {
        match operand {
            Operand::Int(n) => Ok(rt.box_long(*n)),
            Operand::Text(text) => Ok(rt.box_string(text.as_str())),
            Operand::Var { var } => self.lookup(var).map(Value::retain),
        }
    }

    // 重新绑定同名变量会释放旧的引用
    fn bind(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    fn bind_or_emit(&mut self, bind: Option<&str>, value: Value) -> io::Result<()> {
        match bind {
            Some(name) => {
                self.bind(name, value);
                Ok(())
            }
            None => self.emit(Some(&value)),
        }
    }

    fn emit(&mut self, value: Option<&Value>) -> io::Result<()> {
        match value {
            Some(value) => write_line(&mut self.out, value),
            None => writeln!(self.out, "None"),
        }
    }
}

/// 把脚本的 `init` 块注册为初始化链
///
/// 每个块借用共享的解释器执行自己的步骤。
pub fn init_chain<W: Write + 'static>(
    script: &Script,
    interpreter: &std::rc::Rc<std::cell::RefCell<Interpreter<W>>>,
) -> InitChain {
    script.init.iter().fold(InitChain::new(), |chain, block| {
        let shared = std::rc::Rc::clone(interpreter);
        let steps = block.steps.clone();
        chain.with(block.name.clone(), move |rt| {
            shared.borrow_mut().run_steps(rt, &steps)
        })
    })
}
