//! Function types available in every session.
//!
//! Most builtins are implemented natively (`coded`). The rest are formulas
//! that go through the formula parser like user definitions: split variants
//! (`x < center ? ... : ...`), area-parametrized variants written in terms
//! of the height-parametrized function, and plain expressions.

use crate::tplate::CodedKind;

/// One row of the builtin table. Lists are comma separated.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinDef {
    pub name: &'static str,
    pub fargs: &'static str,
    pub defvals: &'static str,
    pub rhs: &'static str,
    pub linear_d: bool,
    pub peak_d: bool,
    pub coded: Option<CodedKind>,
}

const fn coded(
    name: &'static str,
    fargs: &'static str,
    defvals: &'static str,
    rhs: &'static str,
    linear_d: bool,
    peak_d: bool,
    kind: CodedKind,
) -> BuiltinDef {
    BuiltinDef {
        name,
        fargs,
        defvals,
        rhs,
        linear_d,
        peak_d,
        coded: Some(kind),
    }
}

const fn formula(
    name: &'static str,
    fargs: &'static str,
    defvals: &'static str,
    rhs: &'static str,
    linear_d: bool,
    peak_d: bool,
) -> BuiltinDef {
    BuiltinDef {
        name,
        fargs,
        defvals,
        rhs,
        linear_d,
        peak_d,
        coded: None,
    }
}

pub const BUILTINS: &[BuiltinDef] = &[
    coded("Constant", "a", "avgy", "a", true, false, CodedKind::Constant),
    coded("Linear", "a0,a1", "intercept,slope", "a0 + a1 * x", true, false, CodedKind::Linear),
    coded(
        "Quadratic",
        "a0,a1,a2",
        "intercept,slope,0",
        "a0 + a1*x + a2*x^2",
        true,
        false,
        CodedKind::Quadratic,
    ),
    coded(
        "Cubic",
        "a0,a1,a2,a3",
        "intercept,slope,0,0",
        "a0 + a1*x + a2*x^2 + a3*x^3",
        true,
        false,
        CodedKind::Cubic,
    ),
    coded(
        "Polynomial4",
        "a0,a1,a2,a3,a4",
        "intercept,slope,0,0,0",
        "a0 + a1*x + a2*x^2 + a3*x^3 + a4*x^4",
        true,
        false,
        CodedKind::Polynomial4,
    ),
    coded(
        "Polynomial5",
        "a0,a1,a2,a3,a4,a5",
        "intercept,slope,0,0,0,0",
        "a0 + a1*x + a2*x^2 + a3*x^3 + a4*x^4 + a5*x^5",
        true,
        false,
        CodedKind::Polynomial5,
    ),
    coded(
        "Polynomial6",
        "a0,a1,a2,a3,a4,a5,a6",
        "intercept,slope,0,0,0,0,0",
        "a0 + a1*x + a2*x^2 + a3*x^3 + a4*x^4 + a5*x^5 + a6*x^6",
        true,
        false,
        CodedKind::Polynomial6,
    ),
    coded(
        "Gaussian",
        "height,center,hwhm",
        ",,",
        "height*exp(-ln(2)*((x-center)/hwhm)^2)",
        false,
        true,
        CodedKind::Gaussian,
    ),
    formula(
        "SplitGaussian",
        "height,center,hwhm1,hwhm2",
        ",,hwhm,hwhm",
        "x < center ? Gaussian(height, center, hwhm1) : Gaussian(height, center, hwhm2)",
        false,
        true,
    ),
    formula(
        "GaussianA",
        "area,center,hwhm",
        ",,",
        "Gaussian(area/hwhm/sqrt(pi/ln(2)), center, hwhm)",
        false,
        true,
    ),
    coded(
        "Lorentzian",
        "height,center,hwhm",
        ",,",
        "height/(1+((x-center)/hwhm)^2)",
        false,
        true,
        CodedKind::Lorentzian,
    ),
    formula(
        "SplitLorentzian",
        "height,center,hwhm1,hwhm2",
        ",,hwhm,hwhm",
        "x < center ? Lorentzian(height, center, hwhm1) : Lorentzian(height, center, hwhm2)",
        false,
        true,
    ),
    formula(
        "LorentzianA",
        "area,center,hwhm",
        ",,",
        "Lorentzian(area/hwhm/pi, center, hwhm)",
        false,
        true,
    ),
    coded(
        "Pearson7",
        "height,center,hwhm,shape",
        ",,,2",
        "height/(1+((x-center)/hwhm)^2*(2^(1/shape)-1))^shape",
        false,
        true,
        CodedKind::Pearson7,
    ),
    formula(
        "SplitPearson7",
        "height,center,hwhm1,hwhm2,shape1,shape2",
        ",,hwhm,hwhm,2,2",
        "x < center ? Pearson7(height, center, hwhm1, shape1) : Pearson7(height, center, hwhm2, shape2)",
        false,
        true,
    ),
    formula(
        "Pearson7A",
        "area,center,hwhm,shape",
        ",,,2",
        "Pearson7(area/(hwhm*exp(lgamma(shape-0.5)-lgamma(shape))*sqrt(pi/(2^(1/shape)-1))), center, hwhm, shape)",
        false,
        true,
    ),
    coded(
        "PseudoVoigt",
        "height,center,hwhm,shape",
        ",,,0.5",
        "height*((1-shape)*exp(-ln(2)*((x-center)/hwhm)^2)+shape/(1+((x-center)/hwhm)^2))",
        false,
        true,
        CodedKind::PseudoVoigt,
    ),
    formula(
        "SplitPseudoVoigt",
        "height,center,hwhm1,hwhm2,shape1,shape2",
        ",,hwhm,hwhm,0.5,0.5",
        "x < center ? PseudoVoigt(height, center, hwhm1, shape1) : PseudoVoigt(height, center, hwhm2, shape2)",
        false,
        true,
    ),
    formula(
        "PseudoVoigtA",
        "area,center,hwhm,shape",
        ",,,0.5",
        "PseudoVoigt(area/hwhm/((1-shape)*sqrt(pi/ln(2))+shape*pi), center, hwhm, shape)",
        false,
        true,
    ),
    coded(
        "Voigt",
        "height,center,gwidth,shape",
        ",,hwhm*0.8,0.1",
        "convolution of Gaussian and Lorentzian #",
        false,
        true,
        CodedKind::Voigt,
    ),
    coded(
        "VoigtA",
        "area,center,gwidth,shape",
        ",,hwhm*0.8,0.1",
        "convolution of Gaussian and Lorentzian #",
        false,
        true,
        CodedKind::VoigtA,
    ),
    coded(
        "EMG",
        "a,b,c,d",
        "height,center,hwhm*0.8,hwhm*0.1",
        "a*c*(2*pi)^0.5/(2*d) * exp((b-x)/d + c^2/(2*d^2)) * (abs(d)/d - erf((b-x)/(2^0.5*c) + c/(2^0.5*d)))",
        false,
        true,
        CodedKind::Emg,
    ),
    coded(
        "DoniachSunjic",
        "h,a,f,e",
        "height,0.1,1,center",
        "h * cos(pi*a/2 + (1-a)*atan((x-e)/f)) / (f^2+(x-e)^2)^((1-a)/2)",
        false,
        true,
        CodedKind::DoniachSunjic,
    ),
    coded(
        "PielaszekCube",
        "a,center,r,s",
        "height*0.016,,300,150",
        "...#",
        false,
        true,
        CodedKind::PielaszekCube,
    ),
    coded(
        "LogNormal",
        "height,center,width,asym",
        ",,2*hwhm,0.1",
        "height*exp(-ln(2)*(ln(2.0*asym*(x-center)/width+1)/asym)^2)",
        false,
        true,
        CodedKind::LogNormal,
    ),
    coded("Spline", "", "", "cubic spline #", false, false, CodedKind::Spline),
    coded("Polyline", "", "", "linear interpolation #", false, false, CodedKind::Polyline),
    formula("ExpDecay", "a,t", "0,1", "a*exp(-x/t)", false, false),
    formula(
        "Sigmoid",
        "lower,upper,xmid,wsig",
        ",,,",
        "lower + (upper-lower)/(1+exp((xmid-x)/wsig))",
        false,
        false,
    ),
];
