#[macro_use]
mod common;

#[cfg(test)]
mod _return {
    tests! {
        after_else in return source: r#"fun f() {
  if (false) {} else { return "ok"; }
  return "bad";
}
print f();"#, is OK
        "ok"
    }

    tests! {
        after_if in return source: r#"fun f() {
  if (true) { return "ok"; }
  return "bad";
}
print f();"#, is OK
        "ok"
    }

    tests! {
        after_while in return source: r#"fun f() {
  while (true) { return "ok"; }
  return "bad";
}
print f();"#, is OK
        "ok"
    }

    tests! {
        at_top_level in return source: "return;", is ERR
        "[line 1] Error at 'return': Can't return from top-level code."
    }

    tests! {
        in_function in return source: r#"fun f() {
  return "ok";
}
print f();"#, is OK
        "ok"
    }

    tests! {
        in_method in return source: r#"class Foo {
  method() {
    return "ok";
  }
}
print Foo().method();"#, is OK
        "ok"
    }

    tests! {
        return_nil_if_no_value in return source: r#"fun f() {
  return;
}
print f();"#, is OK
        "nil"
    }
}
