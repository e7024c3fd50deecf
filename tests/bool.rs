#[macro_use]
mod common;

#[cfg(test)]
mod bool {
    tests! {
        equality in bool source: r#"print true == true;
print true == false;
print false == true;
print false == false;
print 1 == 1;
print nil == nil;"#, is OK
        "true"
        "false"
        "false"
        "true"
        "true"
        "true"
    }

    tests! {
        cross_type_equality_is_false_not_an_error in bool source: r#"print 1 == "1";
print nil == false;
print true != 1;"#, is OK
        "false"
        "false"
        "true"
    }

    tests! {
        not in bool source: r#"print !true;
print !false;
print !!true;"#, is OK
        "false"
        "true"
        "true"
    }
}
