#[macro_use]
mod common;

#[cfg(test)]
mod _while {
    tests! {
        class_in_body in while source: "while (true) class Foo {}", is ERR
        "[line 1] Error at 'class': Expected expression"
    }

    tests! {
        closure_in_body in while source: r#"var i = 0;
var f1 = nil;
var f2 = nil;
var f3 = nil;
while (i < 3) {
  var j = i;
  fun closure() { print j; }
  if (i == 0) f1 = closure;
  if (i == 1) f2 = closure;
  if (i == 2) f3 = closure;
  i = i + 1;
}
f1();
f2();
f3();"#, is OK
        "0"
        "1"
        "2"
    }

    tests! {
        fun_in_body in while source: "while (true) fun foo() {}", is ERR
        "[line 1] Error at 'fun': Expected expression"
    }

    tests! {
        return_inside in while source: r#"fun f() {
  while (true) {
    var i = "i";
    return i;
  }
}
print f();"#, is OK
        "i"
    }

    tests! {
        syntax in while source: r#"var c = 0;
while (c < 3) {
  print c;
  c = c + 1;
}
var d = 3;
while (d > 0) {
  d = d - 1;
  print d;
}"#, is OK
        "0"
        "1"
        "2"
        "2"
        "1"
        "0"
    }

    tests! {
        var_in_body in while source: "while (true) var foo;", is ERR
        "[line 1] Error at 'var': Expected expression"
    }
}
