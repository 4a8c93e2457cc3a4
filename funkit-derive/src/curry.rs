//! Implementation of the `curry!` procedural macro.
//!
//! # Supported Input Forms
//!
//! 1. Closure form: `curry!(|a: i64, b| body)`
//! 2. Function name + arity form: `curry!(function_name, arity)`
//!
//! # Generated Code Structure
//!
//! ## Closure Form
//!
//! For a closure `|a: i64, b| body`, the macro generates:
//!
//! ```text
//! {
//!     let __funkit_function = |a: i64, b: ::funkit::value::Value| body;
//!     ::funkit::curry::Curried::new(::funkit::value::Function::with_parameters(
//!         "<closure>",
//!         ["a", "b"],
//!         move |__funkit_arguments: ::funkit::value::Arguments| {
//!             let __funkit_argument_0: i64 =
//!                 FromValue::from_value(__funkit_arguments.bind(0, "a")?)?;
//!             let __funkit_argument_1: Value =
//!                 FromValue::from_value(__funkit_arguments.bind(1, "b")?)?;
//!             Ok(Value::from(__funkit_function(__funkit_argument_0, __funkit_argument_1)))
//!         },
//!     ))
//! }
//! ```
//!
//! ## Function Name + Arity Form
//!
//! For `curry!(add, 2)` the parameters are named `arg0` and `arg1` and the
//! binding types are left to inference from `add`'s signature.

use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote};
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{Expr, ExprClosure, ExprLit, ExprPath, Lit, Pat, PatIdent, PatType, Token, Type};

enum CurryInput {
    Closure(ExprClosure),
    FunctionWithArity { function: ExprPath, arity: usize },
}

/// A parameter as seen by keyword binding.
struct Parameter {
    name: String,
    ty: Option<Type>,
}

pub fn curry_impl(input: TokenStream) -> TokenStream {
    let expanded = match parse_curry_input(input) {
        Ok(CurryInput::Closure(closure)) => generate_from_closure(closure),
        Ok(CurryInput::FunctionWithArity { function, arity }) => {
            Ok(generate_from_function(&function, arity))
        }
        Err(error) => Err(error),
    };

    expanded.unwrap_or_else(|error| error.to_compile_error())
}

fn parse_curry_input(input: TokenStream) -> syn::Result<CurryInput> {
    let parser = Punctuated::<Expr, Token![,]>::parse_terminated;
    let expressions = syn::parse::Parser::parse2(parser, input)?;

    let mut iterator = expressions.into_iter();
    match (iterator.next(), iterator.next(), iterator.next()) {
        (Some(Expr::Closure(closure)), None, None) => Ok(CurryInput::Closure(closure)),
        (Some(Expr::Path(path)), None, None) => Err(syn::Error::new(
            path.span(),
            "curry! with function name requires arity: curry!(function_name, 2)",
        )),
        (Some(first), Some(second), None) => parse_function_with_arity(first, second),
        (Some(other), None, None) => Err(syn::Error::new(
            other.span(),
            "curry! requires a closure or function name with arity",
        )),
        _ => Err(syn::Error::new(
            Span::call_site(),
            "curry! requires a closure or function name with arity",
        )),
    }
}

fn parse_function_with_arity(first: Expr, second: Expr) -> syn::Result<CurryInput> {
    let function = match first {
        Expr::Path(path) => path,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "expected a function name or path",
            ));
        }
    };

    let arity = match second {
        Expr::Lit(ExprLit {
            lit: Lit::Int(literal_integer),
            ..
        }) => literal_integer.base10_parse::<usize>()?,
        other => {
            return Err(syn::Error::new(
                other.span(),
                "curry! expected an integer literal for arity",
            ));
        }
    };

    if arity < 1 {
        return Err(syn::Error::new(
            function.span(),
            "curry! requires a function with at least 1 argument",
        ));
    }

    Ok(CurryInput::FunctionWithArity { function, arity })
}

fn generate_from_closure(mut closure: ExprClosure) -> syn::Result<TokenStream> {
    if closure.inputs.is_empty() {
        return Err(syn::Error::new(
            closure.span(),
            "curry! requires a closure with at least 1 argument",
        ));
    }

    let mut parameters = Vec::with_capacity(closure.inputs.len());
    for input in &mut closure.inputs {
        parameters.push(annotate_parameter(input)?);
    }

    let function_expression = quote! { #closure };
    Ok(generate_stage("<closure>", &parameters, &function_expression))
}

/// Records the parameter and gives untyped parameters the `Value` type.
fn annotate_parameter(input: &mut Pat) -> syn::Result<Parameter> {
    match input {
        Pat::Ident(identifier) => {
            let parameter = Parameter {
                name: identifier.ident.to_string(),
                ty: None,
            };
            *input = Pat::Type(PatType {
                attrs: Vec::new(),
                pat: Box::new(Pat::Ident(identifier.clone())),
                colon_token: <Token![:]>::default(),
                ty: Box::new(syn::parse_quote! { ::funkit::value::Value }),
            });
            Ok(parameter)
        }
        Pat::Type(PatType { pat, ty, .. }) => match pat.as_ref() {
            Pat::Ident(PatIdent { ident, .. }) => Ok(Parameter {
                name: ident.to_string(),
                ty: Some(ty.as_ref().clone()),
            }),
            other => Err(destructuring_error(other)),
        },
        other => Err(destructuring_error(other)),
    }
}

fn destructuring_error(pattern: &Pat) -> syn::Error {
    syn::Error::new(
        pattern.span(),
        "curry! parameters must be plain identifiers so they can be bound by keyword",
    )
}

fn generate_from_function(function: &ExprPath, arity: usize) -> TokenStream {
    let name = function
        .path
        .segments
        .last()
        .map_or_else(|| String::from("<function>"), |segment| segment.ident.to_string());

    let parameters: Vec<_> = (0..arity)
        .map(|index| Parameter {
            name: format!("arg{index}"),
            ty: None,
        })
        .collect();

    let function_expression = quote! { #function };
    generate_stage(&name, &parameters, &function_expression)
}

fn generate_stage(
    name: &str,
    parameters: &[Parameter],
    function_expression: &TokenStream,
) -> TokenStream {
    let names: Vec<_> = parameters.iter().map(|parameter| &parameter.name).collect();

    let argument_identifiers: Vec<_> = (0..parameters.len())
        .map(|index| format_ident!("__funkit_argument_{}", index))
        .collect();

    let bindings = parameters
        .iter()
        .zip(&argument_identifiers)
        .enumerate()
        .map(|(index, (parameter, identifier))| {
            let parameter_name = &parameter.name;
            let annotation = parameter.ty.as_ref().map(|ty| quote! { : #ty });
            quote! {
                let #identifier #annotation = ::funkit::value::FromValue::from_value(
                    __funkit_arguments.bind(#index, #parameter_name)?,
                )?;
            }
        });

    quote! {
        {
            let __funkit_function = #function_expression;
            ::funkit::curry::Curried::new(::funkit::value::Function::with_parameters(
                #name,
                [#(#names),*],
                move |__funkit_arguments: ::funkit::value::Arguments|
                    -> ::funkit::Result<::funkit::value::Value> {
                    #(#bindings)*
                    ::std::result::Result::Ok(::funkit::value::Value::from(
                        __funkit_function(#(#argument_identifiers),*),
                    ))
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn expand(input: TokenStream) -> String {
        curry_impl(input).to_string().replace(' ', "")
    }

    #[rstest]
    fn test_closure_parameters_become_signature() {
        let expanded = expand(quote! { |a: i64, b| a });
        assert!(expanded.contains(r#"["a","b"]"#));
        assert!(expanded.contains(r#""<closure>""#));
    }

    #[rstest]
    fn test_untyped_parameter_is_value() {
        let expanded = expand(quote! { |a: i64, b| a });
        assert!(expanded.contains("b:::funkit::value::Value"));
        assert!(expanded.contains("let__funkit_argument_0:i64"));
    }

    #[rstest]
    fn test_function_form_names_parameters_positionally() {
        let expanded = expand(quote! { ops::add, 2 });
        assert!(expanded.contains(r#""add""#));
        assert!(expanded.contains(r#"["arg0","arg1"]"#));
        assert!(!expanded.contains("compile_error"));
    }

    #[rstest]
    #[case(quote! { || 1 })]
    #[case(quote! { add, 0 })]
    #[case(quote! { add, "2" })]
    #[case(quote! { add })]
    #[case(quote! { |(a, b): (i64, i64)| a + b })]
    #[case(quote! { 42 })]
    #[case(quote! { add, 2, 3 })]
    fn test_invalid_input_is_compile_error(#[case] input: TokenStream) {
        assert!(expand(input).contains("compile_error"));
    }
}
