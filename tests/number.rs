#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        decimal_point_at_eof in number source: "123.", is ERR
        "[line 1] Error at '.': Expected property name after '.'"
    }

    tests! {
        leading_dot in number source: ".123;", is ERR
        "[line 1] Error at '.': Expected expression"
    }

    tests! {
        literals in number source: r#"print 123;
print 987654;
print 0;
print -0;
print 123.456;
print -0.001;"#, is OK
        "123"
        "987654"
        "0"
        "-0"
        "123.456"
        "-0.001"
    }

    tests! {
        nan_equality in number source: r#"print (0/0) == (0/0);
print (0/0) != (0/0);
var nan = 0/0;
print nan == nan;
print nan != nan;"#, is OK
        "false"
        "true"
        "false"
        "true"
    }

    tests! {
        trailing_dot in number source: "var x = 1.;", is ERR
        "[line 1] Error at '.': Expected property name after '.'"
    }
}
