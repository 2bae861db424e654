/// Suffix used when the callable type carries no usable name.
pub(crate) const UNNAMED_CALLABLE: &str = "unknown";

/// Best-effort name of a callable type, used as the default label suffix.
///
/// Generic arguments and closure segments are dropped, so a fn item
/// `app::math::divide` yields `divide` and a closure defined inside
/// `app::main` yields `main`. Function pointers, trait objects and standard
/// library wrappers such as `Box<dyn Fn(..)>` name no callable and yield
/// [`UNNAMED_CALLABLE`]. `type_name` output is not a stable format; pass an
/// explicit label suffix where the exact text matters.
pub(crate) fn callable_name<F: ?Sized>() -> &'static str {
    let mut full = std::any::type_name::<F>();
    while let Some(rest) = full.strip_prefix('&') {
        full = rest.strip_prefix("mut ").unwrap_or(rest);
    }

    if ["fn(", "unsafe ", "extern ", "dyn ", "impl ", "(", "[", "*"]
        .iter()
        .any(|prefix| full.starts_with(prefix))
    {
        return UNNAMED_CALLABLE;
    }

    let path = full.split('<').next().unwrap_or(full);
    if ["alloc::", "core::", "std::"]
        .iter()
        .any(|krate| path.starts_with(krate))
    {
        return UNNAMED_CALLABLE;
    }

    path.split("::")
        .filter(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .last()
        .unwrap_or(UNNAMED_CALLABLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::sync::Arc;

    fn divide(a: i32, b: i32) -> i32 {
        a / b
    }

    fn name_of<F>(_: &F) -> &'static str {
        callable_name::<F>()
    }

    #[test]
    fn test_fn_item_name() {
        assert_eq!(name_of(&divide), "divide");
        assert_eq!(callable_name::<&fn(i32, i32) -> i32>(), UNNAMED_CALLABLE);
    }

    #[test]
    fn test_reference_to_fn_item_keeps_name() {
        let by_ref = &divide;
        assert_eq!(name_of(&by_ref), "divide");
    }

    #[test]
    fn test_closure_takes_enclosing_fn_name() {
        let closure = |x: i32| x + 1;
        assert_eq!(name_of(&closure), "test_closure_takes_enclosing_fn_name");
    }

    #[test]
    fn test_fn_pointer_is_unnamed() {
        let pointer: fn(i32, i32) -> i32 = divide;
        assert_eq!(name_of(&pointer), UNNAMED_CALLABLE);
    }

    #[test]
    fn test_boxed_and_shared_closures_are_unnamed() {
        let boxed: Box<dyn Fn(i32, i32) -> i32> = Box::new(divide);
        let shared: Arc<dyn Fn(i32, i32) -> i32> = Arc::new(divide);
        let local: Rc<dyn Fn(i32, i32) -> i32> = Rc::new(divide);

        assert_eq!(name_of(&boxed), UNNAMED_CALLABLE);
        assert_eq!(name_of(&shared), UNNAMED_CALLABLE);
        assert_eq!(name_of(&local), UNNAMED_CALLABLE);
        assert_eq!(callable_name::<dyn Fn(i32) -> i32>(), UNNAMED_CALLABLE);
        assert_eq!(callable_name::<&dyn Fn(i32) -> i32>(), UNNAMED_CALLABLE);
    }
}
