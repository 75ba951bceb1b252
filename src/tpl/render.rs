use crate::error::TemplateError;
use crate::tpl::ast::{Guard, Node};
use crate::tpl::engine::Engine;
use crate::tpl::render_context::Context;
use crate::value::Value;
use std::io::Write;
use tracing::trace;

pub(crate) fn guard_holds(guard: &Guard, ctx: &Context) -> bool {
    match guard {
        Guard::Always => true,
        Guard::Exists(query) => ctx.find(query).is_some(),
        Guard::Truthy(query) => match ctx.find(query) {
            None => false,
            // Any non-empty string is true, even "false" or "0".
            Some(Value::Str(s)) => !s.is_empty(),
            Some(value) => value.to_bool(),
        },
    }
}

pub(crate) fn render(
    node: &Node,
    ctx: &mut Context,
    out: &mut dyn Write,
    engine: &Engine,
) -> Result<(), TemplateError> {
    match node {
        Node::Text(t) => out.write_all(t.as_bytes())?,
        Node::Sequence(nodes) => {
            for child in nodes {
                render(child, ctx, out, engine)?;
            }
        }
        Node::Interpolation(query) => {
            if let Some(value) = ctx.find(query) {
                out.write_all(value.to_text().as_bytes())?;
            }
        }
        Node::Conditional(branches) => {
            if let Some(branch) = branches.iter().find(|b| guard_holds(&b.guard, ctx)) {
                render(&branch.body, ctx, out, engine)?;
            }
        }
        Node::Loop {
            variable,
            source,
            body,
        } => {
            if !ctx.is_record() {
                return Ok(());
            }
            let Some(items) = ctx.find_array(source) else {
                return Ok(());
            };
            for item in items {
                ctx.bind(variable, item);
                let rendered = render(body, ctx, out, engine);
                ctx.unbind(variable);
                rendered?;
            }
            // 空数组也要移除同名字段
            ctx.unbind(variable);
        }
        Node::Include(path) => {
            trace!("include: path={}", path.display());
            let template = engine.load(path)?;
            render(template.root(), ctx, out, engine)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tpl::template::Template;

    fn render_str(src: &str, data: &mut Value) -> String {
        Template::parse(src).unwrap().render_to_string(data).unwrap()
    }

    fn json(s: &str) -> Value {
        Value::from_json(s).unwrap()
    }

    #[test]
    fn test_plain_text() {
        let src = "no directives here\n  at all ? > <\n";
        assert_eq!(render_str(src, &mut json("{}")), src);
        assert_eq!(render_str(src, &mut json("[1, 2]")), src);
        assert_eq!(render_str(src, &mut Value::Null), src);
    }

    #[test]
    fn test_echo() {
        let mut data = json(r#"{"name": "tom", "n": 3, "f": 1.5, "ok": true, "list": [1, "a"], "nil": null}"#);
        assert_eq!(render_str("hi <?= name ?>!", &mut data), "hi tom!");
        assert_eq!(render_str("<? echo n ?>/<?= f ?>/<?= ok ?>", &mut data), "3/1.5/true");
        assert_eq!(render_str("<?= list ?>", &mut data), r#"[1,"a"]"#);
        assert_eq!(render_str("[<?= missing ?>][<?= nil ?>]", &mut data), "[][]");
    }

    #[test]
    fn test_echo_forms_identical() {
        let mut data = json(r#"{"a": {"b": [5, 6]}}"#);
        assert_eq!(
            render_str("x<?=a.b[1]?>y", &mut data),
            render_str("x<? echo a.b[1] ?>y", &mut data)
        );
    }

    #[test]
    fn test_if_elsif_else() {
        let src = "<? if a ?>A<? elsif b ?>B<? else ?>C<? endif ?>";
        assert_eq!(render_str(src, &mut json(r#"{"a": false, "b": true}"#)), "B");
        assert_eq!(render_str(src, &mut json(r#"{"a": false, "b": false}"#)), "C");
        assert_eq!(render_str(src, &mut json(r#"{"a": true, "b": true}"#)), "A");
        assert_eq!(render_str(src, &mut json(r#"{"a": true, "b": false}"#)), "A");
        assert_eq!(render_str(src, &mut json("{}")), "C");
    }

    #[test]
    fn test_no_branch_matches() {
        let src = "[<? if a ?>A<? elif b ?>B<? endif ?>]";
        assert_eq!(render_str(src, &mut json("{}")), "[]");
    }

    #[test]
    fn test_truthiness_of_strings() {
        let src = "<? if v ?>T<? else ?>F<? endif ?>";
        assert_eq!(render_str(src, &mut json(r#"{"v": ""}"#)), "F");
        assert_eq!(render_str(src, &mut json(r#"{"v": "false"}"#)), "T");
        assert_eq!(render_str(src, &mut json(r#"{"v": "0"}"#)), "T");
        assert_eq!(render_str(src, &mut json(r#"{"v": 0}"#)), "F");
        assert_eq!(render_str(src, &mut json(r#"{"v": []}"#)), "F");
        assert_eq!(render_str(src, &mut json(r#"{"v": {"k": 1}}"#)), "T");
        assert_eq!(render_str(src, &mut json(r#"{"v": null}"#)), "F");
    }

    #[test]
    fn test_exists_differs_from_truthy() {
        let mut data = json(r#"{"v": ""}"#);
        assert_eq!(render_str("<? if v ?>yes<? endif ?>", &mut data), "");
        assert_eq!(render_str("<? ifexist v ?>yes<? endif ?>", &mut data), "yes");
        assert_eq!(render_str("<? ifexist w ?>yes<? else ?>no<? endif ?>", &mut data), "no");
    }

    #[test]
    fn test_loop_binds_in_order() {
        let mut data = json(r#"{"y": [10, 20, 30]}"#);
        assert_eq!(
            render_str("<? for x y ?>[<?= x ?>]<? endfor ?>", &mut data),
            "[10][20][30]"
        );
        assert_eq!(data.get("x"), None);
    }

    #[test]
    fn test_loop_removes_preexisting_field() {
        let mut data = json(r#"{"x": "before", "y": [1]}"#);
        assert_eq!(render_str("<? for x y ?><?= x ?><? endfor ?>", &mut data), "1");
        assert_eq!(data.get("x"), None);
    }

    #[test]
    fn test_empty_loop_removes_preexisting_field() {
        let mut data = json(r#"{"x": "before", "y": []}"#);
        assert_eq!(render_str("<? for x y ?>b<? endfor ?>", &mut data), "");
        assert_eq!(data.get("x"), None);

        let mut absent = json(r#"{"x": "before"}"#);
        assert_eq!(render_str("<? for x y ?>b<? endfor ?>", &mut absent), "");
        assert_eq!(absent.get("x"), Some(&Value::from("before")));
    }

    #[test]
    fn test_loop_sees_outer_fields() {
        let mut data = json(r#"{"sep": "-", "rows": [{"id": 1}, {"id": 2}]}"#);
        assert_eq!(
            render_str("<? for r rows ?><?= r.id ?><?= sep ?><? endfor ?>", &mut data),
            "1-2-"
        );
    }

    #[test]
    fn test_loop_no_ops() {
        let src = "<? for x y ?>body<? endfor ?>";
        assert_eq!(render_str(src, &mut json("{}")), "");
        assert_eq!(render_str(src, &mut json(r#"{"y": "str"}"#)), "");
        assert_eq!(render_str(src, &mut json(r#"{"y": []}"#)), "");
        assert_eq!(render_str(src, &mut json("[1, 2]")), "");
        assert_eq!(render_str(src, &mut Value::Null), "");
    }

    #[test]
    fn test_nested_loops() {
        let mut data = json(r#"{"m": [[1, 2], [3]]}"#);
        let src = "<? for row m ?><? for c row ?><?= c ?><? endfor ?>;<? endfor ?>";
        assert_eq!(render_str(src, &mut data), "12;3;");
        assert_eq!(data, json(r#"{"m": [[1, 2], [3]]}"#));
    }

    #[test]
    fn test_block_lines_leave_no_blank_lines() {
        let src = "items:\n<? for i xs ?>\n- <?= i ?>\n<? endfor ?>\ndone\n";
        assert_eq!(
            render_str(src, &mut json(r#"{"xs": ["a", "b"]}"#)),
            "items:\n- a\n- b\ndone\n"
        );
    }

    #[test]
    fn test_deep_nesting_renders() {
        let depth = 30;
        let mut src = String::new();
        for i in 0..depth {
            src.push_str(&format!("<? if on ?><? for v{i} xs ?>"));
        }
        src.push_str("x");
        for _ in 0..depth {
            src.push_str("<? endfor ?><? endif ?>");
        }
        let out = render_str(&src, &mut json(r#"{"on": true, "xs": [1]}"#));
        assert_eq!(out, "x");
    }
}
