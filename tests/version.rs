use piglit::{Api, Version};

macro_rules! assert_versions {
    ( $api:path, $gl_major:expr, $gl_minor:expr => $glsl_major:expr, $glsl_minor:expr) => {
        assert_eq!(
            Version($api, $gl_major, $gl_minor).get_glsl_version(),
            Version($api, $glsl_major, $glsl_minor)
        );
    }
}

#[test]
fn valid_gl_versions() {
    // irregular versions
    assert_versions!(Api::Gl, 2, 0 => 1, 1);
    assert_versions!(Api::Gl, 2, 1 => 1, 2);
    assert_versions!(Api::Gl, 3, 0 => 1, 3);
    assert_versions!(Api::Gl, 3, 1 => 1, 4);
    assert_versions!(Api::Gl, 3, 2 => 1, 5);

    // test a few regular versions
    assert_versions!(Api::Gl, 3, 3 => 3, 3);
    assert_versions!(Api::Gl, 4, 0 => 4, 0);
    assert_versions!(Api::Gl, 4, 6 => 4, 6);
}

#[test]
fn valid_gles_versions() {
    // only irregular version
    assert_versions!(Api::GlEs, 2, 0 => 1, 0);

    // some regular versions
    assert_versions!(Api::GlEs, 3, 0 => 3, 0);
    assert_versions!(Api::GlEs, 3, 2 => 3, 2);
}

#[test]
#[should_panic]
fn invalid_gl_version() {
    Version(Api::Gl, 1, 5).get_glsl_version();
}

#[test]
#[should_panic]
fn invalid_gles_version() {
    Version(Api::GlEs, 1, 1).get_glsl_version();
}

#[test]
fn driver_version_strings() {
    let parse = |s| Version::parse_gl_version(s).unwrap();

    assert_eq!(parse("4.6.0 NVIDIA 535.54.03"), Version(Api::Gl, 4, 6));
    assert_eq!(parse("4.5 (Core Profile) Mesa 23.1.4"), Version(Api::Gl, 4, 5));
    assert_eq!(parse("OpenGL ES 3.2 Mesa 23.1.4"), Version(Api::GlEs, 3, 2));
    assert_eq!(parse("OpenGL ES-CM 1.1"), Version(Api::GlEs, 1, 1));
    assert!(Version::parse_gl_version("unknown").is_err());
}

#[test]
fn shading_language_strings() {
    assert_eq!(Version::parse_glsl_version("4.60 NVIDIA", Api::Gl).unwrap(),
               Version(Api::Gl, 4, 6));
    assert_eq!(Version::parse_glsl_version("OpenGL ES GLSL ES 3.20", Api::GlEs).unwrap(),
               Version(Api::GlEs, 3, 2));
    assert_eq!(Version::parse_glsl_version("1.10", Api::Gl).unwrap(),
               Version(Api::Gl, 1, 1));
}

#[test]
fn cross_api_comparisons() {
    assert!(Version(Api::Gl, 3, 0) > Version(Api::Gl, 2, 1));
    assert!(!(Version(Api::GlEs, 3, 0) >= Version(Api::Gl, 2, 0)));
    assert!(!(Version(Api::GlEs, 3, 0) < Version(Api::Gl, 2, 0)));
}
