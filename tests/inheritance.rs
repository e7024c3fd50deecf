#[macro_use]
mod common;

#[cfg(test)]
mod inheritance {
    tests! {
        inherit_methods in inheritance source: r#"class Base {
  foo() {
    print "foo";
  }
}
class Derived < Base {}
var derived = Derived();
derived.foo();"#, is OK
        "foo"
    }

    tests! {
        set_fields_from_base_class_initializer in inheritance source: r#"class Base {
  init(a) {
    this.a = a;
  }
}
class Derived < Base {}
var derived = Derived("value");
print derived.a;"#, is OK
        "value"
    }

    tests! {
        inherit_from_non_class in inheritance source: r#"var NotAClass = "not a class";
class Foo < NotAClass {}"#, is ERR
        "Superclass must be a class."
        "[line 2]"
    }

    tests! {
        parenthesized_superclass_name in inheritance source: "class Foo < (Base) {}", is ERR
        "[line 1] Error at '<': Expect superclass name"
    }
}
