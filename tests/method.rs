#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests! {
        arity in method source: r#"class Foo {
  sum(a, b, c) {
    return a + b + c;
  }
}
print Foo().sum(1, 2, 3);"#, is OK
        "6"
    }

    tests! {
        empty_body_returns_nil in method source: r#"class Foo {
  bar() {}
}
print Foo().bar();"#, is OK
        "nil"
    }

    tests! {
        print_bound_method in method source: r#"class Foo {
  method() {}
}
print Foo().method;"#, is OK
        "<fn method>"
    }

    tests! {
        not_found in method source: r#"class Foo {}
var foo = Foo();
foo.unknown();"#, is ERR
        "Undefined property 'unknown'."
        "[line 3]"
    }

    tests! {
        extra_arguments in method source: r#"class Foo {
  method(a, b) {}
}
Foo().method(1, 2, 3, 4);"#, is ERR
        "Expected 2 arguments but got 4."
        "[line 4]"
    }

    tests! {
        method_is_not_a_bare_name_in_its_own_body in method source: r#"class Foo {
  method() {
    print method;
  }
}
Foo().method();"#, is ERR
        "Undefined variable 'method'."
        "[line 3]"
    }
}
