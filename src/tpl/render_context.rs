use crate::value::{Query, Value};

/// Data a render pass reads queries from and binds loop variables into.
pub struct Context<'a> {
    root: &'a mut Value,
}

impl<'a> Context<'a> {
    pub fn new(root: &'a mut Value) -> Self {
        Self { root }
    }

    pub fn find(&self, query: &str) -> Option<&Value> {
        Query::new(&*self.root).find(query)
    }

    /// Owned copy of the array at `query`, so the body may mutate the root while iterating.
    pub fn find_array(&self, query: &str) -> Option<Vec<Value>> {
        Query::new(&*self.root).find_array(query).map(<[Value]>::to_vec)
    }

    pub fn is_record(&self) -> bool {
        self.root.is_record()
    }

    /// 在根记录上设置字段，已存在则覆盖
    pub fn bind(&mut self, name: &str, value: Value) {
        self.root.set(name, value);
    }

    pub fn unbind(&mut self, name: &str) {
        self.root.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut root = Value::from_json(r#"{"a": 1, "b": {"c": [1, 2]}}"#).unwrap();
        let ctx = Context::new(&mut root);

        assert_eq!(ctx.find("a"), Some(&Value::I64(1)));
        assert_eq!(ctx.find("z"), None);
        assert_eq!(ctx.find_array("b.c"), Some(vec![Value::I64(1), Value::I64(2)]));
        assert_eq!(ctx.find_array("a"), None);
    }

    #[test]
    fn test_bind_overwrites_and_unbind_removes() {
        let mut root = Value::from_json(r#"{"a": 1}"#).unwrap();
        let mut ctx = Context::new(&mut root);

        ctx.bind("a", Value::I64(2));
        assert_eq!(ctx.find("a"), Some(&Value::I64(2)));

        ctx.unbind("a");
        assert_eq!(ctx.find("a"), None);
    }

    #[test]
    fn test_non_record_root() {
        let mut root = Value::List(vec![]);
        let mut ctx = Context::new(&mut root);
        assert!(!ctx.is_record());
        ctx.bind("a", Value::I64(1));
        assert_eq!(ctx.find("a"), None);
    }
}
