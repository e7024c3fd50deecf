#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        empty in class source: r#"class Foo {}
print Foo;"#, is OK
        "<class Foo>"
    }

    tests! {
        inherit_self in class source: "class Foo < Foo {}", is ERR
        "[line 1] Error at 'Foo': A class can't inherit from itself."
    }

    tests! {
        inherited_method in class source: r#"class Foo {
  foo() {
    print "foo";
  }
}
class Bar < Foo {
  bar() {
    print "bar";
  }
}
class Baz < Bar {
  baz() {
    print "baz";
  }
}
var baz = Baz();
baz.foo();
baz.bar();
baz.baz();"#, is OK
        "foo"
        "bar"
        "baz"
    }

    tests! {
        inherit_other in class source: r#"class A {}
class B < A {}
print B;"#, is OK
        "<class B>"
    }

    tests! {
        reference_self in class source: r#"class Foo {
  identify() {
    return Foo;
  }
}
print Foo().identify();"#, is OK
        "<class Foo>"
    }
}
