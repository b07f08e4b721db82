/// Asserts that the provided block panics. The block is wrapped in
/// [`AssertUnwindSafe`](std::panic::AssertUnwindSafe) so it can borrow containers mutably, which
/// means that the state left behind is exactly what the tests go on to inspect.
#[allow(unused_macros)]
macro_rules! assert_panics {
    ($run:block) => {
        assert_panics!($run, "assertion failed to panic")
    };
    ($run:block, $msg:literal) => {
        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| $run)).is_err(),
            $msg
        );
        println!("^ panic caught");
    };
}

#[allow(unused_imports)]
pub(crate) use assert_panics;
