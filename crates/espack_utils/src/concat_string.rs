/// Concatenates `&str` expressions into one `String` with a single
/// pre-sized allocation.
#[macro_export]
macro_rules! concat_string {
  ($($s:expr),+ $(,)?) => {{
    let mut out = String::with_capacity(0 $(+ AsRef::<str>::as_ref(&$s).len())+);
    $(out.push_str(AsRef::<str>::as_ref(&$s));)+
    out
  }};
}

#[test]
fn concatenates_mixed_str_kinds() {
  let owned = String::from("b");
  assert_eq!(concat_string!("a", owned, "c"), "abc");
}
