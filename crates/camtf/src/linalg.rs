use glam::{DMat3, DVec3};

/// Convert a row-major 3x3 array into a glam matrix.
///
/// # Arguments
///
/// * `rows` - A 3x3 array where `rows[i][j]` is the element at row `i`, column `j`.
///
/// # Returns
///
/// The glam matrix (column-major storage).
pub fn mat3_from_rows(rows: &[[f64; 3]; 3]) -> DMat3 {
    DMat3::from_cols_array_2d(rows).transpose()
}

/// Convert a glam matrix into a row-major 3x3 array.
pub fn mat3_to_rows(mat: &DMat3) -> [[f64; 3]; 3] {
    mat.transpose().to_cols_array_2d()
}

/// Append the homogeneous coordinate `1` to a 3D point.
///
/// Example:
///
/// ```
/// use camtf::linalg::to_homogeneous;
///
/// assert_eq!(to_homogeneous(&[1.0, 2.0, 3.0]), [1.0, 2.0, 3.0, 1.0]);
/// ```
pub fn to_homogeneous(point: &[f64; 3]) -> [f64; 4] {
    [point[0], point[1], point[2], 1.0]
}

/// Multiply a matrix with a column vector given as an array.
pub fn mat3_mul_vec3(mat: &DMat3, v: &[f64; 3]) -> [f64; 3] {
    mat.mul_vec3(DVec3::from_array(*v)).to_array()
}

/// Determinant of a row-major 3x3 array.
pub fn determinant(rows: &[[f64; 3]; 3]) -> f64 {
    mat3_from_rows(rows).determinant()
}

/// Write matrix rows in a bracketed, aligned layout.
pub(crate) fn write_rows<const N: usize>(
    f: &mut std::fmt::Formatter<'_>,
    rows: &[[f64; N]],
) -> std::fmt::Result {
    for (i, row) in rows.iter().enumerate() {
        let open = if i == 0 { "[[" } else { " [" };
        write!(f, "{open}")?;
        for (j, val) in row.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{val:>13.6e}")?;
        }
        if i + 1 == rows.len() {
            write!(f, "]]")?;
        } else {
            writeln!(f, "]")?;
        }
    }
    Ok(())
}
