#[macro_use]
mod common;

#[cfg(test)]
mod call {
    tests! {
        bool in call source: "true();", is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        nil in call source: "nil();", is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        num in call source: "123();", is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        string in call source: "\"str\"();", is ERR
        "Can only call functions and classes."
        "[line 1]"
    }

    tests! {
        instance in call source: r#"class Foo {}
var foo = Foo();
foo();"#, is ERR
        "Can only call functions and classes."
        "[line 3]"
    }
}
