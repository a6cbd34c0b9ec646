pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[macro_export]
macro_rules! verify_index {
    ($index:expr, $capacity:expr) => {{
        $crate::result::verify_index($index, $capacity)?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

/// Checks a bit index against the inclusive upper bound `capacity`.
#[inline]
pub fn verify_index(index: usize, capacity: usize) -> Result<()> {
    if index <= capacity {
        Ok(())
    } else {
        index_out_of_range(index, capacity)
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidArgument {
        name: name.to_string(),
        message: condition.to_string(),
    }
    .into())
}

#[cold]
pub fn index_out_of_range(index: usize, capacity: usize) -> Result<()> {
    Err(crate::error::ErrorKind::IndexOutOfRange { index, capacity }.into())
}
