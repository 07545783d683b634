#[test]
fn stow_error_ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/stow_error_pass.rs");
    t.pass("tests/ui/stow_error_context_chain.rs");
    t.compile_fail("tests/ui/stow_error_not_enum.rs");
    t.compile_fail("tests/ui/stow_error_tuple_variant.rs");
    t.compile_fail("tests/ui/stow_error_no_context.rs");
    t.compile_fail("tests/ui/stow_error_bad_context_type.rs");
}
