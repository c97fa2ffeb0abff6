//! Rendering of programs to the textual calculus.
//!
//! The `Display` impls on [`Program`], [`Function`] and
//! [`Statement`](crate::statement::Statement) are pure. The helpers here
//! normalize empty bodies first, so the rendered function and the stored
//! function agree afterwards.

use thiserror::Error;

use crate::filter_name;
use crate::function::Function;
use crate::program::{Program, ROOT_FUNCTION};
use crate::properties::Properties;
use crate::statement::callee_params;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Root function '{0}' not found")]
    MissingRoot(String),
    #[error("Unable to find target location of properties: {0:?}")]
    UnplacedProperties(Vec<String>),
}

/// Options for annotated rendering.
#[derive(Debug, Clone)]
pub struct PrintOptions {
    /// Function rendered first.
    pub root: String,
    /// Filtered-name prefixes of runtime and library internals left out.
    pub excluded_prefixes: Vec<String>,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            root: ROOT_FUNCTION.to_string(),
            excluded_prefixes: ["os", "syscall", "internal_poll", "sync.o"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl PrintOptions {
    fn is_excluded(&self, f: &Function) -> bool {
        let name = f.simple_name();
        self.excluded_prefixes
            .iter()
            .any(|prefix| name.starts_with(prefix.as_str()))
    }
}

/// Render one function, materializing `tau` into an empty body first.
pub fn render_function(f: &mut Function) -> String {
    f.normalize();
    f.to_string()
}

/// Plain rendering of every non-empty function in registration order.
pub fn render_program(program: &Program) -> String {
    program.to_string()
}

/// Render `f` with the annotations of its own line before the header and
/// the annotations of each statement's line before that statement.
fn write_annotated(out: &mut String, f: &Function, props: &mut Properties) {
    for prop in props.take(&f.pos) {
        out.push_str(&format!("{prop}\n"));
    }
    out.push_str(&format!(
        "def {}({}):\n",
        f.simple_name(),
        callee_params(&f.params)
    ));
    for stmt in &f.stmts {
        for prop in props.take(stmt.position()) {
            out.push_str(&format!("    {prop}\n"));
        }
        out.push_str(&format!("    {stmt};\n"));
    }
}

/// Annotated rendering: the root first, then every other function not
/// excluded by `opts`, with annotations consumed from `props`.
///
/// Functions whose filtered name equals the root's filtered name are left
/// out, so the output holds a single root definition.
///
/// Rendered functions are normalized. Annotations left over afterwards are
/// reported as [`RenderError::UnplacedProperties`]; callers must treat that
/// as fatal.
pub fn render_with_properties(
    program: &mut Program,
    props: &mut Properties,
    opts: &PrintOptions,
) -> Result<String, RenderError> {
    if !program.contains(&opts.root) {
        return Err(RenderError::MissingRoot(opts.root.clone()));
    }
    let root_name = filter_name(&opts.root);
    let order: Vec<String> = std::iter::once(opts.root.clone())
        .chain(
            program
                .functions()
                .filter(|f| f.simple_name() != root_name && !opts.is_excluded(f))
                .map(|f| f.name.clone()),
        )
        .collect();

    let mut out = String::new();
    for name in &order {
        if let Some(f) = program.function_mut(name) {
            f.normalize();
            write_annotated(&mut out, f, props);
        }
    }

    if !props.is_empty() {
        tracing::warn!(
            "{} annotation(s) did not match any rendered function or statement",
            props.len()
        );
        return Err(RenderError::UnplacedProperties(props.drain_remaining()));
    }
    Ok(out)
}
