#[macro_use]
mod common;

#[cfg(test)]
mod _super {
    tests! {
        bound_method in super source: r#"class Base {
  method() {
    print "Base.method()";
  }
}
class Derived < Base {
  getClosure() {
    return super.method;
  }
}
var closure = Derived().getClosure();
closure();"#, is OK
        "Base.method()"
    }

    tests! {
        call_other_method in super source: r#"class Base {
  foo() {
    print "Base.foo()";
  }
}
class Derived < Base {
  bar() {
    print "Derived.bar()";
    this.foo();
  }
}
Derived().bar();"#, is OK
        "Derived.bar()"
        "Base.foo()"
    }

    tests! {
        call_same_method in super source: r#"class Base {
  foo() {
    print "Base.foo()";
  }
}
class Derived < Base {
  foo() {
    print "Derived.foo()";
    super.foo();
  }
}
Derived().foo();"#, is OK
        "Derived.foo()"
        "Base.foo()"
    }

    tests! {
        closure in super source: r#"class Base {
  toString() { return "Base"; }
}
class Derived < Base {
  getClosure() {
    fun closure() {
      return super.toString();
    }
    return closure;
  }
  toString() { return "Derived"; }
}
var closure = Derived().getClosure();
print closure();"#, is OK
        "Base"
    }

    tests! {
        constructor in super source: r#"class Base {
  init(a, b) {
    print "Base.init(" + a + ", " + b + ")";
  }
}
class Derived < Base {
  init() {
    print "Derived.init()";
    super.init("a", "b");
  }
}
Derived();"#, is OK
        "Derived.init()"
        "Base.init(a, b)"
    }

    tests! {
        extra_arguments in super source: r#"class Base {
  foo(a, b) {
    print "Base.foo(" + a + ", " + b + ")";
  }
}
class Derived < Base {
  foo() {
    super.foo("a", "b", "c", "d");
  }
}
Derived().foo();"#, is ERR
        "Expected 2 arguments but got 4."
        "[line 8]"
    }

    tests! {
        missing_arguments in super source: r#"class Base {
  foo(a, b) {
    print "Base.foo(" + a + ", " + b + ")";
  }
}
class Derived < Base {
  foo() {
    super.foo("a");
  }
}
Derived().foo();"#, is ERR
        "Expected 2 arguments but got 1."
        "[line 8]"
    }

    tests! {
        indirectly_inherited in super source: r#"class A {
  foo() {
    print "A.foo()";
  }
}
class B < A {
  foo() {
    print "B.foo()";
    super.foo();
  }
}
class C < B {
  foo() {
    print "C.foo()";
    super.foo();
  }
}
C().foo();"#, is OK
        "C.foo()"
        "B.foo()"
        "A.foo()"
    }

    tests! {
        no_superclass_bind in super source: r#"class Base {
  foo() {
    super.doesNotExist;
  }
}
Base().foo();"#, is ERR
        "[line 3] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        no_superclass_call in super source: r#"class Base {
  foo() {
    super.doesNotExist(1);
  }
}
Base().foo();"#, is ERR
        "[line 3] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        no_superclass_method in super source: r#"class Base {
  foo() {
    super.doesNotExist();
  }
}
Base().foo();"#, is ERR
        "[line 3] Error at 'super': Can't use 'super' in a class with no superclass."
    }

    tests! {
        parenthesized in super source: "class Foo < (Base) {}", is ERR
        "[line 1] Error at '<': Expect superclass name"
    }

    tests! {
        reassign_superclass in super source: r#"class Base {
  method() {
    print "Base.method()";
  }
}
class Derived < Base {
  method() {
    super.method();
  }
}
class OtherBase {
  method() {
    print "OtherBase.method()";
  }
}
Base = OtherBase;
Derived().method();"#, is OK
        "Base.method()"
    }

    tests! {
        super_at_top_level in super source: "super.method();", is ERR
        "[line 1] Error at 'super': Can't use 'super' outside of a class."
    }

    tests! {
        super_in_closure_in_inherited_method in super source: r#"class Base {
  toString() { return "Base"; }
}
class Derived < Base {
  getClosure() {
    fun closure() {
      return super.toString();
    }
    return closure;
  }
  toString() { return "Derived"; }
}
var closure = Derived().getClosure();
print closure();"#, is OK
        "Base"
    }

    tests! {
        super_in_inherited_method in super source: r#"class A {
  foo() {
    print "A.foo()";
  }
}
class B < A {
  foo() {
    print "B.foo()";
    super.foo();
  }
}
class C < B {}
C().foo();"#, is OK
        "B.foo()"
        "A.foo()"
    }

    tests! {
        super_in_top_level_function in super source: r#"fun f() {
  super.bar();
}"#, is ERR
        "[line 2] Error at 'super': Can't use 'super' outside of a class."
    }

    tests! {
        super_without_dot in super source: r#"class Base {}
class Derived < Base {
  foo() {
    super;
  }
}"#, is ERR
        "[line 4] Error at 'super': Expect '.' after 'super'"
    }

    tests! {
        super_without_name in super source: r#"class Base {}
class Derived < Base {
  foo() {
    super.;
  }
}"#, is ERR
        "[line 4] Error at '.': Expect superclass method name"
    }

    tests! {
        this_in_superclass_method in super source: r#"class Base {
  init(a) {
    this.a = a;
  }
}
class Derived < Base {
  init(a, b) {
    super.init(a);
    this.b = b;
  }
}
var derived = Derived("a", "b");
print derived.a;
print derived.b;"#, is OK
        "a"
        "b"
    }
}
